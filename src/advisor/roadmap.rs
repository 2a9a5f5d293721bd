//! Phased roadmap text shared by the rule-based backend and the normalizer.
//!
//! A roadmap is a flat list of lines: a marker-prefixed bold header per
//! phase, `• `-prefixed bullets, and an empty line between phases. Renderers
//! depend on that layout.

/// One phase of the general roadmap.
struct Phase {
    header: &'static str,
    bullets: [&'static str; 3],
}

const DISCOVERY: Phase = Phase {
    header: "📋 **Phase 1: Discovery & Strategy**",
    bullets: [
        "Comprehensive needs assessment and business analysis",
        "Strategic planning and technology recommendations",
        "Project scope definition and success metrics",
    ],
};

const DESIGN: Phase = Phase {
    header: "🎨 **Phase 2: Design & Architecture**",
    bullets: [
        "User experience research and wireframing",
        "Visual design and brand integration",
        "Technical architecture planning",
    ],
};

const DEVELOPMENT: Phase = Phase {
    header: "⚙️ **Phase 3: Development & Implementation**",
    bullets: [
        "Agile development with regular check-ins",
        "Quality assurance and testing",
        "Performance optimization and security",
    ],
};

const LAUNCH: Phase = Phase {
    header: "🚀 **Phase 4: Launch & Growth**",
    bullets: [
        "Deployment and go-live support",
        "Training and documentation",
        "Ongoing optimization and growth strategies",
    ],
};

const DESIGN_KEYWORDS: [&str; 3] = ["design", "ui", "ux"];
const DEVELOPMENT_KEYWORDS: [&str; 3] = ["app", "website", "api"];

fn render(phases: &[&Phase]) -> Vec<String> {
    let mut lines = Vec::with_capacity(phases.len() * 5);
    for (i, phase) in phases.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(phase.header.to_string());
        lines.extend(phase.bullets.iter().map(|b| format!("• {}", b)));
    }
    lines
}

/// Roadmap tailored to lower-cased input.
///
/// Discovery and Launch are always present. Design and Development are added
/// on keyword containment; phase numbers stay fixed even when a phase is
/// skipped.
pub fn general_roadmap(input_lower: &str) -> Vec<String> {
    let mut phases = vec![&DISCOVERY];
    if DESIGN_KEYWORDS.iter().any(|k| input_lower.contains(k)) {
        phases.push(&DESIGN);
    }
    if DEVELOPMENT_KEYWORDS.iter().any(|k| input_lower.contains(k)) {
        phases.push(&DEVELOPMENT);
    }
    phases.push(&LAUNCH);
    render(&phases)
}

/// The full four-phase roadmap used when a reply carries none.
pub fn default_roadmap() -> Vec<String> {
    render(&[&DISCOVERY, &DESIGN, &DEVELOPMENT, &LAUNCH])
}
