use crate::models::AuthUser;
use super::{escape, page};

pub fn render_home(user: Option<&AuthUser>, error: Option<&str>, url_value: &str) -> String {
    let error_html = error
        .map(|e| format!(r#"<p class="error" role="alert">{}</p>"#, escape(e)))
        .unwrap_or_default();

    let body = format!(
        r#"<section class="card">
<h1>Votre site est-il accessible à tous ?</h1>
<p>Analysez gratuitement une page web selon les critères WCAG 2.1 niveau AA et recevez un rapport clair, en français, avec des conseils de correction.</p>
<form method="post" action="/submit">
<label for="url">Adresse de la page</label><br>
<input type="url" id="url" name="url" required placeholder="https://exemple.fr" value="{url}">
<button class="primary" type="submit">Analyser</button>
</form>
{error_html}
</section>"#,
        url = escape(url_value),
    );
    page("Accueil", user, None, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_keeps_submitted_value_escaped() {
        let html = render_home(None, Some("URL invalide"), "\"><script>");
        assert!(html.contains("URL invalide"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
        assert!(!html.contains("\"><script>"));
    }
}
