//! Style blocks, one per section.
//!
//! Each section acquires its block when it mounts and releases it when it
//! is released, so a block is in the document only while its section is.

pub const HERO_STYLE_ID: &str = "hero-animations";

const HERO_CSS: &str = r#"
@keyframes fadeInUp {
    from { opacity: 0; transform: translateX(-50px); }
    to { opacity: 1; transform: translateX(0); }
}
@keyframes profileImage {
    from { scale: 0.8; opacity: 0; }
    to { scale: 1; opacity: 1; }
}
@keyframes blink {
    0%, 50% { opacity: 1; }
    51%, 100% { opacity: 0; }
}
.text-animate { animation: fadeInUp 0.8s ease-out forwards; }
.hero-line-1 { animation-delay: 0.1s; }
.hero-line-2 { animation-delay: 0.2s; }
.hero-line-3 { animation-delay: 0.3s; }
.profile-image { animation: profileImage 2.5s ease-out 0.3s forwards; }
.cursor { animation: blink 1s infinite; }
"#;

const ABOUT_CSS: &str = r#"
@keyframes fadeInUp {
    from { opacity: 0; transform: translateY(30px); }
    to { opacity: 1; transform: translateY(0); }
}
@keyframes fadeInRight {
    from { opacity: 0; transform: translateX(50px); }
    to { opacity: 1; transform: translateX(0); }
}
@keyframes blurIn {
    from { opacity: 0; }
    to { opacity: 1; }
}
.about-container { animation: blurIn 0.6s ease-out forwards; }
.about-title { animation: fadeInUp 0.7s ease-out 0.1s both; }
.about-text { animation: fadeInUp 0.7s ease-out 0.3s both; }
.about-scene { animation: fadeInRight 0.8s ease-out 0.4s both; }
"#;

const SKILLS_CSS: &str = r#"
@keyframes fadeInDown {
    from { opacity: 0; transform: translateY(-30px); }
    to { opacity: 1; transform: translateY(0); }
}
@keyframes fadeInUp {
    from { opacity: 0; transform: translateY(30px); }
    to { opacity: 1; transform: translateY(0); }
}
@keyframes skillBarFill {
    from { transform: translateX(-80px); }
    to { transform: translateX(0); }
}
.skills-title { animation: fadeInDown 0.8s ease-out both; }
.skills-text { animation: fadeInUp 0.8s ease-out 0.5s both, skillBarFill 1s ease-out both; }
.skills-scene { animation: fadeInUp 0.8s ease-out 0.2s both; }
@media (max-width: 768px) {
    .skills-text { animation: fadeInUp 0.7s ease-out 0.1s both; }
}
"#;

const EXPERIENCE_CSS: &str = r#"
@keyframes fadeInDown {
    from { opacity: 0; transform: translateY(-30px); }
    to { opacity: 1; transform: translateY(0); }
}
@keyframes slideInLeft {
    from { opacity: 0; transform: translateX(-100px); }
    to { opacity: 1; transform: translateX(0); }
}
.experience-title { animation: fadeInDown 0.8s ease-out both; }
.experience-text { animation: slideInLeft 0.5s ease-out 0.4s both; }
.experience-scene { animation: fadeInDown 0.6s ease-out 0.8s both; }
"#;

const PROJECTS_CSS: &str = r#"
@keyframes fadeInUp {
    from { opacity: 0; transform: translateY(30px); }
    to { opacity: 1; transform: translateY(0); }
}
@keyframes fadeInLeft {
    from { opacity: 0; transform: translateX(-50px); }
    to { opacity: 1; transform: translateX(0); }
}
.projects-title { animation: fadeInUp 0.8s ease-out both; }
.projects-text { animation: fadeInLeft 0.8s ease-out 0.2s both; }
.projects-scene { animation: fadeInUp 0.8s ease-out 0.4s both; }
"#;

const RESUME_CSS: &str = r#"
@keyframes fadeInUp {
    from { opacity: 0; transform: translateY(30px); }
    to { opacity: 1; transform: translateY(0); }
}
.resume-title { animation: fadeInUp 0.8s ease-out both; }
.resume-text { animation: fadeInUp 0.8s ease-out 0.3s both; }
.resume-scene { animation: fadeInUp 0.8s ease-out 0.5s both; }
"#;

const ACHIEVEMENTS_CSS: &str = r#"
@keyframes fadeInUp {
    from { opacity: 0; transform: translateY(30px); }
    to { opacity: 1; transform: translateY(0); }
}
@keyframes scaleIn {
    from { opacity: 0; transform: scale(0.8); }
    to { opacity: 1; transform: scale(1); }
}
.achievements-title { animation: fadeInUp 0.8s ease-out both; }
.achievements-text { animation: fadeInUp 0.8s ease-out 0.8s both; }
.achievements-scene { animation: scaleIn 0.6s ease-out 0.4s both; }
"#;

const TESTIMONIALS_CSS: &str = r#"
@keyframes fadeInUp {
    from { opacity: 0; transform: translateY(30px); }
    to { opacity: 1; transform: translateY(0); }
}
@keyframes fadeInRight {
    from { opacity: 0; transform: translateX(50px); }
    to { opacity: 1; transform: translateX(0); }
}
.testimonials-title { animation: fadeInUp 0.8s ease-out both; }
.testimonials-text { animation: fadeInRight 0.8s ease-out 0.3s both; }
.testimonials-scene { animation: fadeInUp 0.8s ease-out 0.6s both; }
"#;

const CONTACT_CSS: &str = r#"
@keyframes fadeInUp {
    from { opacity: 0; transform: translateY(30px); }
    to { opacity: 1; transform: translateY(0); }
}
@keyframes fadeInLeft {
    from { opacity: 0; transform: translateX(-50px); }
    to { opacity: 1; transform: translateX(0); }
}
@keyframes blurIn {
    from { opacity: 0; }
    to { opacity: 1; }
}
.contact-container { animation: blurIn 0.6s ease-out forwards; }
.contact-title { animation: fadeInUp 0.7s ease-out 0.1s both; }
.contact-text { animation: fadeInUp 0.7s ease-out 0.3s both; }
.contact-form { animation: fadeInLeft 0.8s ease-out 0.2s both; }
.contact-scene { animation: fadeInUp 0.8s ease-out 0.5s both; }
"#;

/// Style block id and css text for a section.
pub fn section_style(key: &str) -> Option<(String, &'static str)> {
    let css = match key {
        "hero" => return Some((HERO_STYLE_ID.to_string(), HERO_CSS)),
        "about" => ABOUT_CSS,
        "skills" => SKILLS_CSS,
        "experience" => EXPERIENCE_CSS,
        "projects" => PROJECTS_CSS,
        "resume" => RESUME_CSS,
        "achievements" => ACHIEVEMENTS_CSS,
        "testimonials" => TESTIMONIALS_CSS,
        "contact" => CONTACT_CSS,
        _ => return None,
    };
    Some((format!("{key}-animations"), css))
}
