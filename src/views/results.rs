use crate::models::{AuthUser, ScanRecord, ScanStatus, Violation};
use crate::utils::formatting::format_timestamp;
use super::{escape, impact_label, page, ScoreBand};

const PENDING_REFRESH_SECS: u32 = 5;

/// Report page for a stored scan, or the not-found state for `lookup`.
pub fn render_results(record: Option<&ScanRecord>, lookup: &str, user: Option<&AuthUser>) -> String {
    let Some(record) = record else {
        let body = format!(
            r#"<section class="card">
<h1>Aucun résultat</h1>
<p>Aucune analyse trouvée pour <strong>{}</strong>.</p>
<p><a href="/">Lancer une analyse</a></p>
</section>"#,
            escape(lookup)
        );
        return page("Résultats", user, None, &body);
    };

    let header = format!(
        r#"<p>Page analysée : <a href="{url}" rel="noopener">{url}</a><br><small>{date}</small></p>"#,
        url = escape(&record.url),
        date = format_timestamp(&record.created_at),
    );

    match record.status {
        ScanStatus::Pending => {
            let body = format!(
                r#"<section class="card" aria-busy="true">
<h1>Analyse en cours…</h1>
{header}
<p>Cette page se mettra à jour automatiquement.</p>
</section>"#
            );
            page("Analyse en cours", user, Some(PENDING_REFRESH_SECS), &body)
        }
        ScanStatus::Failed => {
            let body = format!(
                r#"<section class="card">
<h1>L'analyse a échoué</h1>
{header}
<p class="error">Le site n'a pas pu être analysé. Vérifiez qu'il est accessible publiquement puis réessayez.</p>
<p><a href="/">Réessayer</a></p>
</section>"#
            );
            page("Échec de l'analyse", user, None, &body)
        }
        ScanStatus::Completed => {
            let score = record.score.unwrap_or(0);
            let band = ScoreBand::from_score(score);
            let violations = record.violations.as_deref().unwrap_or_default();

            let list = if violations.is_empty() {
                "<p>Aucun problème détecté. Bravo !</p>".to_string()
            } else {
                violations.iter().map(violation_card).collect::<Vec<_>>().join("\n")
            };

            let body = format!(
                r#"<section class="card">
<h1>Résultats de l'analyse</h1>
{header}
<p class="score {class}" aria-label="Score {score} sur 100">{score}<small>/100</small></p>
<p>{label} · {count} problème(s) détecté(s)</p>
</section>
{list}"#,
                class = band.css_class(),
                label = band.label(),
                count = violations.len(),
            );
            page("Résultats", user, None, &body)
        }
    }
}

fn violation_card(violation: &Violation) -> String {
    let nodes = violation
        .nodes
        .iter()
        .map(|n| {
            format!(
                "<li><code>{}</code><pre>{}</pre></li>",
                escape(&n.target),
                escape(&n.html)
            )
        })
        .collect::<String>();
    let nodes = if nodes.is_empty() {
        String::new()
    } else {
        format!("<h3>Éléments concernés</h3><ul>{}</ul>", nodes)
    };

    format!(
        r#"<article class="card">
<span class="badge impact-{impact}">{impact_label}</span>
<h2>{title}</h2>
<pre>{help}</pre>
{nodes}
</article>"#,
        impact = violation.impact.as_str(),
        impact_label = impact_label(violation.impact),
        title = escape(&violation.description),
        help = escape(&violation.help),
    )
}
