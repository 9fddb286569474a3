//! Sidebar navigation model

/// Base path the single-page app is served under
pub const APP_BASE_PATH: &str = "/app";

/// One sidebar entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    /// Route path (in-app) or server page path (external)
    pub path: &'static str,
    /// Label shown when the sidebar is open
    pub label: &'static str,
    /// Icon shown in both sidebar widths
    pub icon: &'static str,
    /// Server-rendered page reached through a plain link
    pub external: bool,
}

/// Sidebar entries in display order
pub const NAV_ITEMS: [NavItem; 6] = [
    NavItem {
        path: "/",
        label: "Dashboard",
        icon: "📊",
        external: false,
    },
    NavItem {
        path: "/dashboard",
        label: "Dashboard (Flask)",
        icon: "📈",
        external: true,
    },
    NavItem {
        path: "/checkinout",
        label: "Check In/Out",
        icon: "🔧",
        external: true,
    },
    NavItem {
        path: "/reports",
        label: "Reports",
        icon: "📋",
        external: true,
    },
    NavItem {
        path: "/settings",
        label: "Settings",
        icon: "⚙️",
        external: true,
    },
    NavItem {
        path: "/logs",
        label: "Logs",
        icon: "📜",
        external: true,
    },
];

impl NavItem {
    /// Whether this entry is highlighted for `current_path` (a path inside
    /// the app, without the base). External entries never are; the root
    /// matches only exactly, everything else also by prefix.
    pub fn is_active(&self, current_path: &str) -> bool {
        !self.external
            && (current_path == self.path
                || (self.path != "/" && current_path.starts_with(self.path)))
    }
}

/// Strip [`APP_BASE_PATH`] from a browser pathname. `/app` and `/app/`
/// become `/`; paths outside the app are returned unchanged.
pub fn strip_base(pathname: &str) -> &str {
    match pathname.strip_prefix(APP_BASE_PATH) {
        Some("") => "/",
        Some(rest) if rest.starts_with('/') => rest,
        _ => pathname,
    }
}

/// Width class of the sidebar
pub const fn sidebar_class(open: bool) -> &'static str {
    if open {
        "sidebar sidebar-open"
    } else {
        "sidebar sidebar-collapsed"
    }
}

/// Offset class of the main content next to the sidebar
pub const fn content_class(open: bool) -> &'static str {
    if open {
        "content content-wide-offset"
    } else {
        "content content-narrow-offset"
    }
}

/// Accessible label of the toggle button
pub const fn toggle_label(open: bool) -> &'static str {
    if open { "Close sidebar" } else { "Open sidebar" }
}

/// Glyph of the toggle button
pub const fn toggle_glyph(open: bool) -> &'static str {
    if open { "←" } else { "→" }
}

/// Class of a nav link
pub const fn link_class(active: bool) -> &'static str {
    if active {
        "nav-link nav-link-active"
    } else {
        "nav-link"
    }
}
