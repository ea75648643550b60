//! Deterministic static website used whenever AI generation is unavailable.

use db::models::file_node::FileNode;
use strum_macros::{AsRefStr, Display, EnumString};
use utils::text::capitalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum SiteCategory {
    Portfolio,
    Landing,
    Blog,
    Ecommerce,
    Restaurant,
    Dashboard,
    Modern,
}

/// Checked in order; the first category with a matching keyword wins.
const CATEGORY_KEYWORDS: &[(SiteCategory, &[&str])] = &[
    (SiteCategory::Portfolio, &["portfolio", "personal"]),
    (SiteCategory::Landing, &["landing", "saas"]),
    (SiteCategory::Blog, &["blog", "article"]),
    (SiteCategory::Ecommerce, &["ecommerce", "shop"]),
    (SiteCategory::Restaurant, &["restaurant", "food"]),
    (SiteCategory::Dashboard, &["dashboard", "admin"]),
];

impl SiteCategory {
    pub fn detect(prompt: &str) -> Self {
        let prompt = prompt.to_lowercase();
        CATEGORY_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| prompt.contains(k)))
            .map(|(category, _)| *category)
            .unwrap_or(SiteCategory::Modern)
    }

    /// e.g. `Portfolio Website`
    pub fn title(self) -> String {
        format!("{} Website", capitalize(self.as_ref()))
    }
}

/// Build the three-file fallback site for `prompt`. The output depends only on
/// the detected category.
pub fn generate(prompt: &str) -> Vec<FileNode> {
    let title = SiteCategory::detect(prompt).title();

    vec![
        FileNode::file("index.html", "/index.html", render_html(&title)),
        FileNode::file("styles.css", "/styles.css", STYLES_CSS),
        FileNode::file("script.js", "/script.js", render_js(&title)),
    ]
}

fn render_html(title: &str) -> String {
    INDEX_HTML.replace("{{title}}", title)
}

fn render_js(title: &str) -> String {
    SCRIPT_JS.replace("{{title}}", title)
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{title}} - VibesCode.AI</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <link href="https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600;700&display=swap" rel="stylesheet">
    <link rel="stylesheet" href="styles.css">
</head>
<body class="font-inter bg-gray-50">
    <nav class="bg-white shadow-sm border-b sticky top-0 z-50 backdrop-blur-md">
        <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
            <div class="flex justify-between items-center h-16">
                <h1 class="text-xl font-bold gradient-text">{{title}}</h1>
                <div class="hidden md:flex items-center space-x-8">
                    <a href="#home" class="nav-link">Home</a>
                    <a href="#about" class="nav-link">About</a>
                    <a href="#services" class="nav-link">Services</a>
                    <a href="#contact" class="nav-link">Contact</a>
                </div>
                <button id="mobile-menu-btn" class="md:hidden text-gray-500 hover:text-gray-700" aria-label="Open menu">
                    <svg class="h-6 w-6" fill="none" viewBox="0 0 24 24" stroke="currentColor">
                        <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M4 6h16M4 12h16M4 18h16" />
                    </svg>
                </button>
            </div>
        </div>
    </nav>

    <section id="home" class="hero-gradient min-h-screen flex items-center justify-center text-white relative overflow-hidden">
        <div class="floating-element floating-1"></div>
        <div class="floating-element floating-2"></div>
        <div class="relative z-10 text-center max-w-5xl mx-auto px-4 animate-fade-in-up">
            <h1 class="text-5xl md:text-7xl font-bold mb-6 leading-tight">
                Welcome to Your
                <span class="block text-purple-200">{{title}}</span>
            </h1>
            <p class="text-xl md:text-2xl mb-8 text-purple-100 max-w-3xl mx-auto">
                Built with HTML5, CSS3, TailwindCSS, and JavaScript ES6+
            </p>
            <div class="flex flex-col sm:flex-row gap-4 justify-center">
                <button class="cta-button bg-white text-purple-600">Get Started</button>
                <button class="cta-button border-2 border-white text-white">Learn More</button>
            </div>
        </div>
    </section>

    <section id="about" class="py-20 bg-white">
        <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
            <div class="text-center mb-16">
                <h2 class="text-4xl font-bold text-gray-900 mb-4">Modern Features</h2>
                <p class="text-xl text-gray-600">Experience the power of modern web development</p>
            </div>
            <div class="grid md:grid-cols-3 gap-8">
                <div class="feature-card">
                    <h3 class="text-xl font-semibold mb-4">Lightning Fast</h3>
                    <p class="text-gray-600">Optimized performance with modern web technologies.</p>
                </div>
                <div class="feature-card">
                    <h3 class="text-xl font-semibold mb-4">Responsive Design</h3>
                    <p class="text-gray-600">A mobile-first layout that works on every device.</p>
                </div>
                <div class="feature-card">
                    <h3 class="text-xl font-semibold mb-4">Accessible</h3>
                    <p class="text-gray-600">Semantic markup and keyboard friendly navigation.</p>
                </div>
            </div>
        </div>
    </section>

    <section id="services" class="py-20 bg-gray-50">
        <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 grid md:grid-cols-3 gap-8">
            <div class="service-card"><h3 class="text-xl font-semibold mb-3">Web Development</h3><p class="text-gray-600">Custom websites built with modern technologies</p></div>
            <div class="service-card"><h3 class="text-xl font-semibold mb-3">UI/UX Design</h3><p class="text-gray-600">Beautiful and intuitive user experiences</p></div>
            <div class="service-card"><h3 class="text-xl font-semibold mb-3">Mobile Apps</h3><p class="text-gray-600">Native and cross-platform mobile solutions</p></div>
        </div>
    </section>

    <section id="contact" class="py-20 hero-gradient text-white text-center">
        <h2 class="text-4xl font-bold mb-6">Ready to Build Something Amazing?</h2>
        <button class="cta-button bg-white text-purple-600">Start Your Project</button>
    </section>

    <footer class="bg-gray-900 text-gray-400 py-12 text-center">
        <div class="text-2xl font-bold text-white mb-4">{{title}}</div>
        <p>&copy; 2024 {{title}}. All rights reserved.</p>
    </footer>

    <script src="script.js"></script>
</body>
</html>"##;

const STYLES_CSS: &str = r##"/* Modern CSS3 Styles */
* {
    font-family: 'Inter', -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

:root {
    --primary-color: #667eea;
    --secondary-color: #764ba2;
    --text-dark: #1a202c;
    --bg-light: #f7fafc;
    --shadow: 0 10px 25px rgba(0, 0, 0, 0.1);
    --shadow-hover: 0 20px 40px rgba(0, 0, 0, 0.15);
}

html { scroll-behavior: smooth; }

body {
    line-height: 1.6;
    color: var(--text-dark);
    background-color: var(--bg-light);
}

.hero-gradient {
    background: linear-gradient(135deg, var(--primary-color) 0%, var(--secondary-color) 100%);
}

.gradient-text {
    background: linear-gradient(135deg, var(--primary-color), var(--secondary-color));
    -webkit-background-clip: text;
    -webkit-text-fill-color: transparent;
    background-clip: text;
}

.nav-link { position: relative; padding: 0.5rem 0.75rem; color: #4a5568; }
.nav-link:hover { color: var(--primary-color); }

.cta-button {
    padding: 1rem 2rem;
    border-radius: 9999px;
    font-weight: 600;
    box-shadow: var(--shadow);
    transition: all 0.3s ease;
}
.cta-button:hover { box-shadow: var(--shadow-hover); transform: translateY(-2px); }

.feature-card, .service-card {
    padding: 2rem;
    border-radius: 0.75rem;
    background: white;
    box-shadow: var(--shadow);
    transition: transform 0.3s ease, box-shadow 0.3s ease;
}
.feature-card:hover { transform: translateY(-8px); box-shadow: var(--shadow-hover); }
.service-card { border-left: 4px solid transparent; }
.service-card:hover { border-left-color: var(--primary-color); transform: translateX(4px); }

.floating-element {
    position: absolute;
    border-radius: 9999px;
    opacity: 0.2;
    animation: float 6s ease-in-out infinite;
}
.floating-1 { width: 5rem; height: 5rem; background: white; top: 20%; left: 10%; }
.floating-2 { width: 4rem; height: 4rem; background: #d6bcfa; top: 60%; right: 15%; animation-delay: 2s; }

@keyframes float {
    0%, 100% { transform: translateY(0px) rotate(0deg); }
    50% { transform: translateY(-20px) rotate(180deg); }
}

@keyframes fadeInUp {
    from { opacity: 0; transform: translateY(30px); }
    to { opacity: 1; transform: translateY(0); }
}

.animate-fade-in-up { animation: fadeInUp 1s ease-out; }

@media (max-width: 768px) {
    .floating-element { display: none; }
    .cta-button { padding: 0.75rem 1.5rem; font-size: 0.875rem; }
}

button:focus, a:focus {
    outline: 2px solid var(--primary-color);
    outline-offset: 2px;
}
"##;

const SCRIPT_JS: &str = r##"// Modern JavaScript ES6+ for {{title}}
console.log('{{title}} - website loaded');

document.addEventListener('DOMContentLoaded', () => {
    setupSmoothScrolling();
    setupNavigationEffects();
    setupCardAnimations();
    setupMobileMenu();
});

function setupSmoothScrolling() {
    document.querySelectorAll('a[href^="#"]').forEach(anchor => {
        anchor.addEventListener('click', event => {
            event.preventDefault();
            const target = document.querySelector(anchor.getAttribute('href'));
            if (target) {
                target.scrollIntoView({ behavior: 'smooth', block: 'start' });
            }
        });
    });
}

function setupNavigationEffects() {
    const nav = document.querySelector('nav');
    let lastScrollY = window.scrollY;
    window.addEventListener('scroll', throttle(() => {
        const current = window.scrollY;
        nav.style.transform = current > lastScrollY && current > 200 ? 'translateY(-100%)' : 'translateY(0)';
        lastScrollY = current;
    }, 100));
}

function setupCardAnimations() {
    const observer = new IntersectionObserver(entries => {
        entries.forEach(entry => {
            if (entry.isIntersecting) {
                entry.target.classList.add('animate-fade-in-up');
            }
        });
    }, { threshold: 0.1 });
    document.querySelectorAll('.feature-card, .service-card').forEach(el => observer.observe(el));
}

function setupMobileMenu() {
    const button = document.getElementById('mobile-menu-btn');
    if (button) {
        button.addEventListener('click', () => {
            document.querySelector('nav .hidden')?.classList.toggle('hidden');
        });
    }
}

function throttle(fn, limit) {
    let waiting = false;
    return (...args) => {
        if (!waiting) {
            fn(...args);
            waiting = true;
            setTimeout(() => { waiting = false; }, limit);
        }
    };
}
"##;
