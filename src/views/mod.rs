//! Server-rendered HTML pages. Every interpolated value goes through [`escape`].

pub mod dashboard;
pub mod home;
pub mod login;
pub mod results;

use crate::models::{AuthUser, Impact, ScanStatus};

pub use dashboard::render_dashboard;
pub use home::render_home;
pub use login::{render_login, LoginNotice};
pub use results::render_results;

const STYLES: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #1f2937; background: #f9fafb; }
header { background: #1e3a8a; color: #fff; padding: 1rem 2rem; display: flex; justify-content: space-between; align-items: center; }
header a, header button { color: #fff; margin-left: 1rem; background: none; border: 0; font: inherit; cursor: pointer; text-decoration: underline; }
main { max-width: 960px; margin: 2rem auto; padding: 0 1rem; }
.card { background: #fff; border-radius: 8px; padding: 1.5rem; margin-bottom: 1rem; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
.score { font-size: 3rem; font-weight: 700; }
.good { color: #15803d; } .average { color: #a16207; } .poor { color: #b91c1c; }
.badge { display: inline-block; padding: .15rem .6rem; border-radius: 999px; font-size: .8rem; font-weight: 600; }
.impact-critical { background: #fee2e2; color: #991b1b; } .impact-serious { background: #ffedd5; color: #9a3412; }
.impact-moderate { background: #fef9c3; color: #854d0e; } .impact-minor { background: #e0f2fe; color: #075985; }
.status-pending { background: #e5e7eb; } .status-completed { background: #dcfce7; } .status-failed { background: #fee2e2; }
.error { color: #b91c1c; }
pre { background: #f3f4f6; padding: .5rem; overflow-x: auto; white-space: pre-wrap; }
table { width: 100%; border-collapse: collapse; } td, th { text-align: left; padding: .5rem; border-bottom: 1px solid #e5e7eb; }
input[type=url], input[type=email] { width: 70%; padding: .6rem; font-size: 1rem; }
button.primary { padding: .6rem 1.2rem; font-size: 1rem; background: #1e3a8a; color: #fff; border: 0; border-radius: 6px; cursor: pointer; }
"#;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode a value for use in a query string.
pub fn encode_query(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Full HTML document with the shared header.
pub fn page(title: &str, user: Option<&AuthUser>, refresh_secs: Option<u32>, body: &str) -> String {
    let refresh = refresh_secs
        .map(|s| format!(r#"<meta http-equiv="refresh" content="{}">"#, s))
        .unwrap_or_default();
    let nav = match user {
        Some(user) => format!(
            r#"<span>{}</span><a href="/dashboard">Tableau de bord</a><form method="post" action="/logout" style="display:inline"><button type="submit">Déconnexion</button></form>"#,
            escape(&user.email)
        ),
        None => r#"<a href="/login">Connexion</a>"#.to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{refresh}<title>{title} · Scanner d'accessibilité</title>
<style>{STYLES}</style>
</head>
<body>
<header><a href="/" style="margin:0;font-weight:700;text-decoration:none">Scanner d'accessibilité</a><nav>{nav}</nav></header>
<main>
{body}
</main>
</body>
</html>"#,
        title = escape(title),
    )
}

/// Score bands used for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Good,
    Average,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => ScoreBand::Good,
            60..=79 => ScoreBand::Average,
            _ => ScoreBand::Poor,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ScoreBand::Good => "good",
            ScoreBand::Average => "average",
            ScoreBand::Poor => "poor",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Good => "Bon",
            ScoreBand::Average => "Moyen",
            ScoreBand::Poor => "À améliorer",
        }
    }
}

pub fn impact_label(impact: Impact) -> &'static str {
    match impact {
        Impact::Critical => "Critique",
        Impact::Serious => "Sérieux",
        Impact::Moderate => "Modéré",
        Impact::Minor => "Mineur",
    }
}

pub fn status_badge(status: ScanStatus) -> String {
    let label = match status {
        ScanStatus::Pending => "En cours",
        ScanStatus::Completed => "Terminé",
        ScanStatus::Failed => "Échec",
    };
    format!(r#"<span class="badge status-{}">{}</span>"#, status.as_str(), label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">O'Brien & co</a>"#), "&lt;a href=&quot;x&quot;&gt;O&#39;Brien &amp; co&lt;/a&gt;");
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_score(100), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(80), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(79), ScoreBand::Average);
        assert_eq!(ScoreBand::from_score(60), ScoreBand::Average);
        assert_eq!(ScoreBand::from_score(59), ScoreBand::Poor);
        assert_eq!(ScoreBand::from_score(0), ScoreBand::Poor);
    }

    #[test]
    fn test_page_escapes_user_email() {
        let user = AuthUser { id: "u1".into(), email: "<b>@example.com".into() };
        let html = page("Test", Some(&user), Some(5), "<p>body</p>");
        assert!(html.contains("&lt;b&gt;@example.com"));
        assert!(html.contains(r#"content="5""#));
        assert!(html.contains("<p>body</p>"));
    }
}
