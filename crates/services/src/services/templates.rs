//! Built-in starter templates.

use db::models::{
    file_node::FileNode,
    project::{CreateProject, TemplateDifficulty},
};
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, TS)]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub difficulty: TemplateDifficulty,
    pub tags: Vec<String>,
    pub downloads: i64,
    pub rating: f32,
}

#[derive(Debug, Clone, Serialize, TS)]
pub struct Template {
    #[serde(flatten)]
    #[ts(flatten)]
    pub summary: TemplateSummary,
    pub files: Vec<FileNode>,
}

impl Template {
    /// Project data for a fresh copy of this template.
    pub fn to_create_project(&self) -> CreateProject {
        CreateProject {
            name: self.summary.name.clone(),
            description: Some(self.summary.description.clone()),
            files: self.files.clone(),
            template_category: Some(self.summary.category.clone()),
            template_tags: Some(self.summary.tags.clone()),
            template_difficulty: Some(self.summary.difficulty.clone()),
            ..Default::default()
        }
    }
}

struct CatalogEntry {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: &'static str,
    difficulty: TemplateDifficulty,
    tags: &'static [&'static str],
    downloads: i64,
    rating: f32,
    index_html: &'static str,
}

impl CatalogEntry {
    fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            category: self.category.to_string(),
            difficulty: self.difficulty.clone(),
            tags: self.tags.iter().map(|t| t.to_string()).collect(),
            downloads: self.downloads,
            rating: self.rating,
        }
    }

    fn template(&self) -> Template {
        Template {
            summary: self.summary(),
            files: vec![FileNode::file("index.html", "/index.html", self.index_html)],
        }
    }
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        id: "modern-portfolio",
        name: "Modern Portfolio",
        description: "A sleek, dark-themed portfolio website with smooth animations and modern design",
        category: "Portfolio",
        difficulty: TemplateDifficulty::Intermediate,
        tags: &["dark-theme", "animations", "responsive", "modern"],
        downloads: 1247,
        rating: 4.8,
        index_html: PORTFOLIO_HTML,
    },
    CatalogEntry {
        id: "startup-landing",
        name: "SaaS Landing Page",
        description: "Professional SaaS landing page with pricing, features, and testimonials",
        category: "Business",
        difficulty: TemplateDifficulty::Beginner,
        tags: &["saas", "landing-page", "pricing", "testimonials"],
        downloads: 892,
        rating: 4.6,
        index_html: LANDING_HTML,
    },
    CatalogEntry {
        id: "ecommerce-store",
        name: "E-commerce Store",
        description: "Modern online store with product grid, cart, and checkout functionality",
        category: "E-commerce",
        difficulty: TemplateDifficulty::Advanced,
        tags: &["ecommerce", "shopping-cart", "products", "checkout"],
        downloads: 654,
        rating: 4.7,
        index_html: STORE_HTML,
    },
];

/// Every template, without files.
pub fn list() -> Vec<TemplateSummary> {
    CATALOG.iter().map(CatalogEntry::summary).collect()
}

pub fn get(id: &str) -> Option<Template> {
    CATALOG
        .iter()
        .find(|entry| entry.id == id)
        .map(CatalogEntry::template)
}

const PORTFOLIO_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Alex Morgan - Designer &amp; Developer</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        body { background: #0b0b12; }
        .glow { text-shadow: 0 0 24px rgba(167, 139, 250, 0.6); }
        .card { transition: transform .3s ease, border-color .3s ease; }
        .card:hover { transform: translateY(-6px); border-color: #a78bfa; }
    </style>
</head>
<body class="text-gray-200 font-sans">
    <header class="max-w-6xl mx-auto flex justify-between items-center p-6">
        <span class="text-xl font-bold text-white">AM</span>
        <nav class="space-x-6 text-sm">
            <a href="#work" class="hover:text-violet-300">Work</a>
            <a href="#about" class="hover:text-violet-300">About</a>
            <a href="#contact" class="hover:text-violet-300">Contact</a>
        </nav>
    </header>
    <main class="max-w-6xl mx-auto px-6">
        <section class="py-32">
            <h1 class="text-6xl font-bold text-white glow">Designing calm interfaces.</h1>
            <p class="mt-6 text-lg text-gray-400 max-w-xl">I build products that feel fast, look sharp and stay out of the way.</p>
        </section>
        <section id="work" class="grid md:grid-cols-3 gap-6 pb-24">
            <article class="card border border-gray-800 rounded-xl p-6"><h3 class="text-white font-semibold">Nebula</h3><p class="text-gray-400 mt-2">Analytics dashboard</p></article>
            <article class="card border border-gray-800 rounded-xl p-6"><h3 class="text-white font-semibold">Tidal</h3><p class="text-gray-400 mt-2">Music streaming app</p></article>
            <article class="card border border-gray-800 rounded-xl p-6"><h3 class="text-white font-semibold">Fern</h3><p class="text-gray-400 mt-2">Plant care companion</p></article>
        </section>
        <section id="about" class="pb-24 text-gray-400 max-w-2xl">Eight years across design systems, front-end engineering and product strategy.</section>
        <section id="contact" class="pb-24"><a href="mailto:hello@example.com" class="text-violet-300 text-2xl">hello@example.com</a></section>
    </main>
</body>
</html>"##;

const LANDING_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Launchpad - Ship faster</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-white text-gray-900 font-sans">
    <header class="bg-gradient-to-br from-indigo-600 to-purple-600 text-white">
        <nav class="max-w-6xl mx-auto flex justify-between p-6">
            <span class="font-bold text-xl">Launchpad</span>
            <a href="#pricing" class="bg-white/20 px-4 py-2 rounded-full">Pricing</a>
        </nav>
        <div class="max-w-3xl mx-auto text-center py-28 px-6">
            <h1 class="text-5xl font-bold">Ship your product in days, not months</h1>
            <p class="mt-6 text-indigo-100 text-lg">Everything your team needs to plan, build and launch.</p>
            <button class="mt-10 bg-white text-indigo-700 font-semibold px-8 py-4 rounded-full">Start free trial</button>
        </div>
    </header>
    <section class="max-w-6xl mx-auto grid md:grid-cols-3 gap-8 py-24 px-6">
        <div><h3 class="font-semibold text-lg">Realtime sync</h3><p class="text-gray-600 mt-2">Every change, everywhere, instantly.</p></div>
        <div><h3 class="font-semibold text-lg">Integrations</h3><p class="text-gray-600 mt-2">Connect the tools you already use.</p></div>
        <div><h3 class="font-semibold text-lg">Analytics</h3><p class="text-gray-600 mt-2">Know what works and double down.</p></div>
    </section>
    <section id="pricing" class="bg-gray-50 py-24 px-6">
        <div class="max-w-4xl mx-auto grid md:grid-cols-2 gap-8">
            <div class="bg-white rounded-2xl p-8 shadow"><h3 class="font-semibold">Starter</h3><p class="text-4xl font-bold mt-4">$9<span class="text-base text-gray-500">/mo</span></p></div>
            <div class="bg-indigo-600 text-white rounded-2xl p-8 shadow"><h3 class="font-semibold">Team</h3><p class="text-4xl font-bold mt-4">$29<span class="text-base text-indigo-200">/mo</span></p></div>
        </div>
    </section>
    <section class="max-w-3xl mx-auto text-center py-24 px-6">
        <blockquote class="text-2xl italic text-gray-700">"Launchpad cut our release cycle in half."</blockquote>
        <p class="mt-4 text-gray-500">Jamie Lee, CTO at Northwind</p>
    </section>
</body>
</html>"##;

const STORE_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Goods &amp; Co.</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-50 text-gray-900 font-sans">
    <header class="bg-white shadow-sm">
        <div class="max-w-6xl mx-auto flex justify-between items-center p-6">
            <span class="font-bold text-xl">Goods &amp; Co.</span>
            <button id="cart-button" class="bg-gray-900 text-white px-4 py-2 rounded-lg">Cart (<span id="cart-count">0</span>)</button>
        </div>
    </header>
    <main class="max-w-6xl mx-auto p-6">
        <div id="products" class="grid sm:grid-cols-2 md:grid-cols-3 gap-6"></div>
        <aside id="cart" class="hidden mt-10 bg-white rounded-xl shadow p-6">
            <h2 class="font-semibold text-lg mb-4">Your cart</h2>
            <ul id="cart-items" class="space-y-2"></ul>
            <p class="mt-4 font-semibold">Total: $<span id="cart-total">0.00</span></p>
            <button id="checkout" class="mt-4 w-full bg-emerald-600 text-white py-3 rounded-lg">Checkout</button>
        </aside>
    </main>
    <script>
        const products = [
            { id: 1, name: 'Canvas Tote', price: 24.0 },
            { id: 2, name: 'Ceramic Mug', price: 18.5 },
            { id: 3, name: 'Linen Apron', price: 32.0 },
        ];
        const cart = [];

        function render() {
            document.getElementById('products').innerHTML = products.map(p => `
                <div class="bg-white rounded-xl shadow p-6">
                    <h3 class="font-semibold">${p.name}</h3>
                    <p class="text-gray-500">$${p.price.toFixed(2)}</p>
                    <button data-id="${p.id}" class="add mt-4 bg-gray-900 text-white px-4 py-2 rounded-lg">Add to cart</button>
                </div>`).join('');
            document.getElementById('cart-count').textContent = cart.length;
            document.getElementById('cart-items').innerHTML = cart.map(p => `<li>${p.name} - $${p.price.toFixed(2)}</li>`).join('');
            document.getElementById('cart-total').textContent = cart.reduce((sum, p) => sum + p.price, 0).toFixed(2);
        }

        document.addEventListener('click', event => {
            if (event.target.matches('.add')) {
                cart.push(products.find(p => p.id === Number(event.target.dataset.id)));
                render();
            }
            if (event.target.id === 'cart-button') {
                document.getElementById('cart').classList.toggle('hidden');
            }
            if (event.target.id === 'checkout') {
                alert('Thanks for your order!');
                cart.length = 0;
                render();
            }
        });

        render();
    </script>
</body>
</html>"##;
