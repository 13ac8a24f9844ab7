use super::{escape, page};

/// Outcome shown after a login form submission.
pub enum LoginNotice<'a> {
    LinkSent { email: &'a str, dev_link: Option<&'a str> },
    Error(&'a str),
}

pub fn render_login(notice: Option<LoginNotice<'_>>) -> String {
    let notice = match notice {
        Some(LoginNotice::LinkSent { email, dev_link }) => {
            let link = dev_link
                .map(|l| format!(r#"<p><a href="{0}">{0}</a></p>"#, escape(l)))
                .unwrap_or_default();
            format!(
                "<p role=\"status\">Un lien de connexion a été envoyé à <strong>{}</strong>. Il est valable 15 minutes.</p>{}",
                escape(email),
                link
            )
        }
        Some(LoginNotice::Error(message)) => {
            format!(r#"<p class="error" role="alert">{}</p>"#, escape(message))
        }
        None => String::new(),
    };

    let body = format!(
        r#"<section class="card">
<h1>Connexion</h1>
<p>Recevez un lien de connexion par e-mail, sans mot de passe.</p>
<form method="post" action="/login">
<label for="email">Adresse e-mail</label><br>
<input type="email" id="email" name="email" required>
<button class="primary" type="submit">Recevoir le lien</button>
</form>
{notice}
</section>"#
    );
    page("Connexion", None, None, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_link_sent() {
        let html = render_login(Some(LoginNotice::LinkSent {
            email: "a@example.com",
            dev_link: Some("http://localhost/auth/callback?token=abc"),
        }));
        assert!(html.contains("a@example.com"));
        assert!(html.contains("token=abc"));
    }
}
