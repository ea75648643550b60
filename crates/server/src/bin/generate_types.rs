use ts_rs::TS;

fn generate_types_content() -> String {
    let header = "// This file was generated by `generate_types`. Do not edit it by hand.\n\n";
    let decls = [
        db::models::file_node::FileKind::decl(),
        db::models::file_node::FileNode::decl(),
        db::models::project::Project::decl(),
        db::models::project::CreateProject::decl(),
        db::models::project::UpdateProject::decl(),
        db::models::project::UserProjectStats::decl(),
        db::models::project::TemplateDifficulty::decl(),
        db::models::project_like::ProjectLike::decl(),
        db::models::published_site::PublishedSite::decl(),
        db::models::published_site::UpdatePublishedSite::decl(),
        db::models::user::User::decl(),
        db::models::user::SubscriptionTier::decl(),
        db::models::user::UpdateUserProfile::decl(),
        services::services::generation::GenerationResult::decl(),
        services::services::projects::LikeStatus::decl(),
        services::services::projects::CreateFileRequest::decl(),
        services::services::projects::UpdateFileRequest::decl(),
        services::services::projects::RenameFileRequest::decl(),
        services::services::auth::SignUpRequest::decl(),
        services::services::auth::SignInRequest::decl(),
        services::services::publishing::PublishRequest::decl(),
        services::services::templates::TemplateSummary::decl(),
        services::services::templates::Template::decl(),
        services::services::project_transfer::ProjectDocument::decl(),
        server::routes::health::HealthStatus::decl(),
        utils::response::ApiResponse::<()>::decl(),
    ];

    let body = decls
        .into_iter()
        .map(|decl| {
            if decl.starts_with("export") {
                decl
            } else {
                format!("export {}", decl.trim_start())
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{header}{body}\n")
}

fn main() {
    print!("{}", generate_types_content());
}
