use std::path::{Path, PathBuf};
use crate::errors::ScannerError;

pub const RUNNER_FILE: &str = "axe-runner.js";

/// Node.js driver for the headless backend.
///
/// Protocol: one JSON object per line. The runner prints `{"event":"ready"}` once
/// Chromium is up, then answers each command on stdin with `{"ok":true,...}` or
/// `{"ok":false,"kind":...,"message":...}`.
pub const RUNNER_SCRIPT: &str = r#"'use strict';
const readline = require('readline');

function reply(obj) {
  process.stdout.write(JSON.stringify(obj) + '\n');
}

function fail(kind, err) {
  reply({ ok: false, kind, message: String((err && err.message) || err) });
}

(async () => {
  let puppeteer, axe;
  try {
    puppeteer = require('puppeteer-core');
    axe = require('axe-core');
  } catch (err) {
    reply({ event: 'error', kind: 'launch', message: 'Missing runner dependency: ' + err.message });
    process.exit(1);
  }

  let browser, page;
  try {
    browser = await puppeteer.launch({
      executablePath: process.env.CHROME_PATH,
      headless: true,
      pipe: true,
      args: ['--no-sandbox', '--disable-setuid-sandbox', '--disable-dev-shm-usage', '--disable-gpu'],
    });
    page = await browser.newPage();
  } catch (err) {
    reply({ event: 'error', kind: 'launch', message: String(err.message || err) });
    process.exit(1);
  }
  reply({ event: 'ready' });

  const rl = readline.createInterface({ input: process.stdin });
  for await (const line of rl) {
    if (!line.trim()) continue;
    let cmd;
    try {
      cmd = JSON.parse(line);
    } catch (err) {
      fail('engine', 'Malformed command');
      continue;
    }

    if (cmd.action === 'navigate') {
      try {
        await page.goto(cmd.url, { waitUntil: 'domcontentloaded', timeout: cmd.timeoutMs });
        reply({ ok: true });
      } catch (err) {
        fail(err && err.name === 'TimeoutError' ? 'navigation_timeout' : 'navigation', err);
      }
    } else if (cmd.action === 'axe') {
      try {
        await page.addScriptTag({ content: axe.source });
        const result = await page.evaluate(async () => {
          const r = await window.axe.run(document, {
            runOnly: { type: 'tag', values: ['wcag2a', 'wcag2aa', 'wcag21a', 'wcag21aa'] },
          });
          return {
            violations: r.violations.map((v) => ({
              id: v.id,
              impact: v.impact,
              description: v.description,
              help: v.help,
              nodes: v.nodes.slice(0, 3).map((n) => ({ html: n.html, target: n.target })),
            })),
          };
        });
        reply({ ok: true, result });
      } catch (err) {
        fail('engine', err);
      }
    } else if (cmd.action === 'close') {
      try { await browser.close(); } catch (_) {}
      reply({ ok: true });
      process.exit(0);
    } else {
      fail('engine', 'Unknown action ' + cmd.action);
    }
  }
  try { await browser.close(); } catch (_) {}
})();
"#;

/// Write the runner script into `dir`, creating it if needed.
pub fn install_runner(dir: &Path) -> Result<PathBuf, ScannerError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| ScannerError::Launch(format!("Cannot create runner dir {}: {}", dir.display(), e)))?;
    let path = dir.join(RUNNER_FILE);
    std::fs::write(&path, RUNNER_SCRIPT)
        .map_err(|e| ScannerError::Launch(format!("Cannot write runner script: {}", e)))?;
    Ok(path)
}
