use crate::models::{AuthUser, ScanRecord, ScanStats};
use crate::pipeline::QuotaStatus;
use crate::utils::formatting::format_timestamp;
use super::{encode_query, escape, page, status_badge, ScoreBand};

pub fn render_dashboard(
    user: &AuthUser,
    scans: &[ScanRecord],
    quota: &QuotaStatus,
    stats: &ScanStats,
) -> String {
    let average = stats
        .average_score
        .map(|s| format!(r#"<span class="{}">{}/100</span>"#, ScoreBand::from_score(s).css_class(), s))
        .unwrap_or_else(|| "–".to_string());

    let rows = scans
        .iter()
        .map(|scan| {
            let score = scan
                .score
                .map(|s| format!(r#"<span class="{}">{}</span>"#, ScoreBand::from_score(s).css_class(), s))
                .unwrap_or_else(|| "–".to_string());
            format!(
                r#"<tr><td><a href="/results?id={id}">{url}</a></td><td>{status}</td><td>{score}</td><td>{count}</td><td>{date}</td></tr>"#,
                id = encode_query(&scan.id),
                url = escape(&scan.url),
                status = status_badge(scan.status),
                count = scan.violation_count(),
                date = format_timestamp(&scan.created_at),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let table = if scans.is_empty() {
        r#"<p>Aucune analyse pour le moment. <a href="/">Lancer une première analyse</a></p>"#.to_string()
    } else {
        format!(
            "<table><thead><tr><th>Page</th><th>Statut</th><th>Score</th><th>Problèmes</th><th>Date</th></tr></thead><tbody>{}</tbody></table>",
            rows
        )
    };

    let body = format!(
        r#"<section class="card">
<h1>Tableau de bord</h1>
<p>Analyses restantes ce mois-ci : <strong>{remaining}</strong> sur {limit}</p>
<p>Score moyen : {average} · {completed} terminée(s), {failed} en échec, {pending} en cours</p>
</section>
<section class="card">
<h2>Analyses récentes</h2>
{table}
</section>"#,
        remaining = quota.remaining,
        limit = quota.limit,
        completed = stats.completed,
        failed = stats.failed,
        pending = stats.pending,
    );
    page("Tableau de bord", Some(user), None, &body)
}
