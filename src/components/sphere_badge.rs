//! Sphere Badge Component
//!
//! Colored icon + name chip shown on cards, checklists and task groups.

use leptos::prelude::*;

/// Glyph for one of the sphere form's icon names
pub fn icon_glyph(icon: &str) -> &'static str {
    match icon {
        "Home" => "🏠",
        "Briefcase" => "💼",
        "Heart" => "❤",
        "Star" => "⭐",
        "Zap" => "⚡",
        "Coffee" => "☕",
        "Book" => "📖",
        "Music" => "🎵",
        "Dumbbell" => "🏋",
        "Paintbrush" => "🖌",
        _ => "●",
    }
}

#[component]
pub fn SphereBadge(
    #[prop(into)] name: String,
    #[prop(into)] icon: String,
    #[prop(into)] color: String,
) -> impl IntoView {
    let style = format!("background-color: {}", color);
    view! {
        <span class="sphere-badge" style=style>
            <span class="sphere-icon">{icon_glyph(&icon)}</span>
            <span class="sphere-name">{name}</span>
        </span>
    }
}
