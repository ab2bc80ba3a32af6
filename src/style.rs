/// Card background for a node at the given depth.
pub fn depth_color(depth: u32) -> &'static str {
    match depth {
        0 => "#FFD700",
        1 => "#FFEB3B",
        2 => "#FFB74D",
        3 => "#FF9800",
        _ => "#F5F5F5",
    }
}

/// Card border for a node at the given depth; deeper cards have none.
pub fn depth_border(depth: u32) -> Option<&'static str> {
    match depth {
        0 => Some("3px solid #000"),
        1 => Some("2px solid #333"),
        _ => None,
    }
}

/// Accent colour of a business line, matched on its upper-cased name.
pub fn line_color(line: &str) -> &'static str {
    match line.trim().to_uppercase().as_str() {
        "FIRST MILE" => "#FFEB3B",
        "WAREHOUSE" => "#FFC107",
        "LAST MILE" => "#FF9800",
        "LONG HAUL" => "#FF5722",
        _ => "#000000",
    }
}

// Checked in order, first keyword found wins
const ROLE_ICONS: &[(&str, &str)] = &[
    ("COORDINADOR", "📦"),
    ("LIDER", "🧠"),
    ("SUPERVISOR", "👷"),
    ("JEFE", "🧑‍💼"),
];

/// Icon for a role label.
pub fn role_icon(title: &str) -> &'static str {
    ROLE_ICONS
        .iter()
        .find(|(keyword, _)| title.contains(keyword))
        .map(|(_, icon)| *icon)
        .unwrap_or("🔹")
}
