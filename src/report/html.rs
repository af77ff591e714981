use std::collections::BTreeMap;
use std::fmt::Write;

use super::PageSummary;
use crate::grouping::{Group, GroupMode, clean_voice, engine_slug};

/// Escape text for HTML element content and quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

const PROVIDER_CSS: &str = r#"
    body { font-family: system-ui, -apple-system, 'Segoe UI', Roboto, Arial, sans-serif; margin: 24px; }
    header { display:flex; align-items: baseline; gap: 12px; flex-wrap: wrap; }
    h1 { margin: 0; }
    .counts { color: #555; }
    .search { margin-top: 12px; }
    input[type="search"] { padding: 8px 10px; width: 320px; }
    .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(320px, 1fr)); gap: 16px; margin-top: 20px; }
    .card { border: 1px solid #e2e2e2; border-radius: 14px; padding: 12px 14px; }
    .meta { font-size: 14px; color: #555; }
    .filename { font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace; font-size: 12px; color: #333; }
    .source { font-size: 11px; color: #888; }
    .missing { border-color: #ffd7d7; background: #fff7f7; }
    .missing strong { color: #b50000; }
    audio { width: 100%; margin-top: 8px; }
    footer { margin-top: 28px; font-size: 12px; color: #666; }
"#;

const PROVIDER_JS: &str = r#"
    function filterCards(el){
      const q = (el.value || '').toLowerCase();
      document.querySelectorAll('.card').forEach(c=>{
        const hay = (c.getAttribute('data-hay') || '').toLowerCase();
        c.style.display = hay.includes(q) ? '' : 'none';
      });
    }
"#;

const LANGUAGE_CSS: &str = r#"
    :root {
      --bg: #0b0f14; --panel: #0f151d; --card: #141b24; --text: #e6edf3; --muted: #9aa6b2;
      --border: #223043; --danger-bg: #2a1212; --danger-border: #5a1b1b; --danger-text: #ffb3b3;
      --chip-bg: #1a2430; --chip-on: #0e7afe;
    }
    * { box-sizing: border-box; }
    html, body { margin: 0; padding: 0; background: var(--bg); color: var(--text); font-family: ui-sans-serif, system-ui, -apple-system, "Segoe UI", Roboto, Arial; }
    a { color: #7cc4ff; text-decoration: none; }
    a:hover { text-decoration: underline; }
    .wrap { max-width: 1200px; margin: 0 auto; padding: 24px; }
    header { display:flex; align-items: center; justify-content: space-between; gap: 12px; flex-wrap: wrap; margin-bottom: 12px; }
    h1 { margin: 0; font-size: 28px; letter-spacing: 0.3px; }
    .counts { color: var(--muted); font-size: 14px; }
    .pill { display:inline-block; padding:.1rem .5rem; border:1px solid var(--border); border-radius: 999px; margin-left:8px; color: var(--muted); font-size:12px; }
    .panel { background: var(--panel); border: 1px solid var(--border); border-radius: 16px; padding: 14px; position: sticky; top: 0; z-index: 50; }
    .toolbar { display: grid; grid-template-columns: 1fr; gap: 10px; }
    @media (min-width: 760px) { .toolbar { grid-template-columns: 1fr auto; align-items: center; } }
    .search { display:flex; gap: 10px; }
    input[type="search"] { padding: 10px 12px; width: 100%; border-radius: 12px; border: 1px solid var(--border); background: var(--card); color: var(--text); }
    .chips { display:flex; flex-wrap: wrap; gap: 8px; }
    .chips + .chips { margin-top: 10px; }
    .chip { border: 1px solid var(--border); background: var(--chip-bg); color: var(--text); padding: 6px 10px; border-radius: 999px; font-size: 13px; cursor: pointer; user-select: none; }
    .chip.active { outline: 2px solid var(--chip-on); }
    .chip .k { opacity: .7; margin-left: 6px; font-variant-numeric: tabular-nums; }
    .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(320px, 1fr)); gap: 14px; margin-top: 16px; }
    .card { border: 1px solid var(--border); border-radius: 14px; padding: 12px; background: var(--card); }
    .card.missing { border-color: var(--danger-border); background: var(--danger-bg); color: var(--danger-text); }
    .meta { font-size: 14px; color: var(--muted); display:flex; align-items:center; gap: 6px; flex-wrap: wrap; }
    .engine { padding: 2px 8px; border-radius: 999px; font-size: 12px; border: 1px solid var(--border); background: #112235; }
    .engine[data-engine="aws"] { background:#0f2a1e; }
    .engine[data-engine="azure"] { background:#10263b; }
    .engine[data-engine="gcp"] { background:#251f0c; }
    .engine[data-engine="unknown"] { background:#2a2139; }
    .title { font-size: 16px; margin: 8px 0 4px 0; }
    audio { width: 100%; margin-top: 8px; border-radius: 8px; }
    footer { margin: 22px 0 8px; color: var(--muted); font-size: 12px; text-align: center; }
    .legend { color: var(--muted); font-size: 12px; margin-top: 8px; }
"#;

const LANGUAGE_JS: &str = r#"
    const STATE = { engines: new Set(), genders: new Set(), query: '' };

    function applyFilters() {
      const q = STATE.query.toLowerCase();
      const cards = document.querySelectorAll('.card');
      let visible = 0;
      cards.forEach(c => {
        const hay = (c.getAttribute('data-hay') || '').toLowerCase();
        const eng = c.getAttribute('data-engine');
        const gen = (c.getAttribute('data-gender') || '').toLowerCase();
        const show = (STATE.engines.size === 0 || STATE.engines.has(eng))
          && (STATE.genders.size === 0 || STATE.genders.has(gen))
          && (!q || hay.includes(q));
        c.style.display = show ? '' : 'none';
        if (show) visible++;
      });
      document.querySelector('#visibleCount').textContent = visible + "/" + cards.length + " visible";
    }

    function onSearch(el) { STATE.query = el.value || ''; applyFilters(); }

    function toggleChip(set, el, value) {
      if (set.has(value)) { set.delete(value); el.classList.remove('active'); }
      else { set.add(value); el.classList.add('active'); }
      applyFilters();
    }

    function toggleEngine(el) { toggleChip(STATE.engines, el, el.getAttribute('data-value')); }
    function toggleGender(el) { toggleChip(STATE.genders, el, el.getAttribute('data-value')); }

    // Only one sample plays at a time
    document.addEventListener('play', function (e) {
      const target = e.target;
      if (!(target && target.tagName === 'AUDIO')) return;
      document.querySelectorAll('audio').forEach(a => { if (a !== target && !a.paused) a.pause(); });
    }, true);

    window.addEventListener('DOMContentLoaded', applyFilters);
"#;

const INDEX_CSS: &str = r#"
    :root{ --bg:#0b0f14; --panel:#0f151d; --text:#e6edf3; --muted:#9aa6b2; --border:#223043; --card:#141b24; }
    html,body{margin:0;background:var(--bg);color:var(--text);font-family:ui-sans-serif,system-ui,-apple-system,"Segoe UI",Roboto,Arial;}
    a{color:#7cc4ff;text-decoration:none;} a:hover{text-decoration:underline;}
    .wrap{max-width:900px;margin:0 auto;padding:24px;}
    h1{margin:0 0 10px 0;}
    .panel{background:var(--panel);border:1px solid var(--border);border-radius:16px;padding:16px;}
    ul{list-style:none;padding:0;margin:0;}
    li{margin:8px 0;}
    .row{display:flex;justify-content:space-between;gap:8px;flex-wrap:wrap;align-items:center;background:var(--card);border:1px solid var(--border);border-radius:12px;padding:12px;color:inherit;text-decoration:none;}
    .row:hover{outline:2px solid #0e7afe;}
    .stats{color:var(--muted);font-size:13px;}
    .dupe{font-size:12px;color:#ffb3b3;}
"#;

fn page_head(out: &mut String, title: &str, css: &str) {
    let _ = write!(
        out,
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n",
        escape_html(title),
        css
    );
}

/// Page for one provider: every row from every sheet, filename and source shown.
pub fn render_provider_page(group: &Group, generated_at: &str) -> String {
    let counts = group.stats();
    let mut out = String::new();
    page_head(&mut out, &format!("{} · Audio Index", group.label), PROVIDER_CSS);

    let _ = write!(
        out,
        "<header>\n  <h1>{}</h1>\n  <div class=\"counts\">{} rows • {} files found • {} missing</div>\n</header>\n\
         <div class=\"search\">\n  <input type=\"search\" placeholder=\"Filter (lang, voice, gender, filename)...\" oninput=\"filterCards(this)\" />\n</div>\n\
         <div class=\"grid\">\n",
        escape_html(&group.label),
        counts.total,
        counts.found,
        counts.missing
    );

    for e in &group.entries {
        let r = &e.record;
        let hay = [r.lang.as_str(), r.voice.as_str(), r.gender.as_str(), r.filename.as_str()].join(" ");
        let meta = format!(
            "{} · {} ({})",
            escape_html(&r.lang),
            escape_html(&r.voice),
            escape_html(&r.gender)
        );
        let filename = escape_html(&r.filename);
        let source = format!("{}:{}", escape_html(&r.source_csv), r.row);

        if e.present() {
            let _ = write!(
                out,
                "<div class=\"card\" data-hay=\"{}\">\n  <div class=\"meta\">{}</div>\n  <div class=\"filename\">{}</div>\n  \
                 <div class=\"source\">{}</div>\n  \
                 <audio controls preload=\"none\" src=\"{}\" type=\"audio/aac\">\n    Your browser does not support the <code>audio</code> element.\n  </audio>\n</div>\n",
                escape_html(&hay),
                meta,
                filename,
                source,
                escape_html(&e.resolution.path)
            );
        } else {
            let _ = write!(
                out,
                "<div class=\"card missing\" data-hay=\"{}\">\n  <div class=\"meta\">{}</div>\n  <div class=\"filename\">{}</div>\n  \
                 <div class=\"source\">{}</div>\n  <p><strong>Missing file:</strong> {}</p>\n</div>\n",
                escape_html(&hay),
                meta,
                filename,
                source,
                filename
            );
        }
    }

    let _ = write!(
        out,
        "</div>\n<footer>Generated on {}. Source CSV rows combined per engine.</footer>\n<script>{}</script>\n</body>\n</html>\n",
        escape_html(generated_at),
        PROVIDER_JS
    );
    out
}

/// Page for one language: all engines combined, one card per voice, engine and gender chips.
pub fn render_language_page(group: &Group, generated_at: &str) -> String {
    let counts = group.stats();
    let mut out = String::new();
    page_head(&mut out, &format!("{} · Audio Index", group.label), LANGUAGE_CSS);

    let _ = write!(
        out,
        "<div class=\"wrap\">\n  <header>\n    <h1>{} <span class=\"pill\">{}</span> <span class=\"pill\">{} files • {} missing • {} rows</span></h1>\n    \
         <div class=\"counts\" id=\"visibleCount\"></div>\n  </header>\n\n  <div class=\"panel\">\n    <div class=\"toolbar\">\n      \
         <div class=\"search\">\n        <input id=\"q\" type=\"search\" placeholder=\"Search voice, engine, gender…\" oninput=\"onSearch(this)\" />\n      </div>\n      <div>\n",
        escape_html(&group.label),
        escape_html(&group.key),
        counts.found,
        counts.missing,
        counts.total
    );

    out.push_str("        <div class=\"chips\" role=\"group\" aria-label=\"Filter by engine\">");
    for f in group.engine_facets() {
        let name = escape_html(&f.name);
        let _ = write!(
            out,
            "<div class=\"chip engine-chip\" data-value=\"{0}\" onclick=\"toggleEngine(this)\" title=\"Toggle {0}\">{0} <span class=\"k\">{1}/{2}</span></div>",
            name, f.found, f.total
        );
    }
    out.push_str("</div>\n");

    out.push_str("        <div class=\"chips\" role=\"group\" aria-label=\"Filter by gender\">");
    for f in group.gender_facets() {
        let name = escape_html(&f.name);
        let _ = write!(
            out,
            "<div class=\"chip gender-chip\" data-value=\"{0}\" onclick=\"toggleGender(this)\" title=\"Toggle {0}\">{0} <span class=\"k\">{1}/{2}</span></div>",
            name, f.found, f.total
        );
    }
    out.push_str("</div>\n");

    out.push_str(
        "      </div>\n    </div>\n    <div class=\"legend\">Tip: click chips to toggle; use the search box to filter further.</div>\n  </div>\n\n  <div class=\"grid\">\n",
    );

    for e in &group.entries {
        let r = &e.record;
        let slug = engine_slug(&r.engine);
        let hay = [r.engine.as_str(), r.voice.as_str(), r.gender.as_str()].join(" ");
        let gender = r.gender.trim();

        let mut meta = format!(
            "<span class=\"engine\" data-engine=\"{}\">{}</span>",
            escape_html(&slug),
            escape_html(&r.engine)
        );
        if !gender.is_empty() {
            let _ = write!(meta, " • {}", escape_html(gender));
        }

        let title = format!("{}-{}", group.key, clean_voice(&group.key, &r.voice));
        let class = if e.present() { "card" } else { "card missing" };
        let _ = write!(
            out,
            "<div class=\"{}\" data-hay=\"{}\" data-engine=\"{}\" data-gender=\"{}\">\n  <div class=\"meta\">{}</div>\n  <div class=\"title\">{}</div>\n",
            class,
            escape_html(&hay),
            escape_html(&slug),
            escape_html(&gender.to_lowercase()),
            meta,
            escape_html(&title)
        );
        if e.present() {
            let _ = write!(
                out,
                "  <audio controls preload=\"none\" src=\"{}\" type=\"audio/aac\">\n    Your browser does not support the <code>audio</code> element.\n  </audio>\n</div>\n",
                escape_html(&e.resolution.path)
            );
        } else {
            out.push_str("  <p><strong>Missing audio file</strong></p>\n</div>\n");
        }
    }

    let _ = write!(
        out,
        "</div>\n  <footer>Generated on {}. Combined all engines for {}.</footer>\n</div>\n<script>{}</script>\n</body>\n</html>\n",
        escape_html(generated_at),
        escape_html(&group.label),
        LANGUAGE_JS
    );
    out
}

/// Landing page linking every group page, with counts and a shadowed-duplicate note.
pub fn render_index(
    pages: &[PageSummary],
    mode: GroupMode,
    duplicates: &BTreeMap<String, Vec<String>>,
    generated_at: &str,
) -> String {
    let heading = match mode {
        GroupMode::Provider => "Audio Engines",
        GroupMode::Language => "Audio Languages",
    };

    let mut out = String::new();
    page_head(&mut out, heading, INDEX_CSS);
    let _ = write!(
        out,
        "<div class=\"wrap\">\n<h1>{}</h1>\n<div class=\"panel\">\n<ul>\n",
        heading
    );

    for p in pages {
        let key_pill = if p.label != p.key {
            format!(" <span class='stats'>({})</span>", escape_html(&p.key))
        } else {
            String::new()
        };
        let engines = match mode {
            GroupMode::Language => format!(" • engines: {}", escape_html(&p.engines.join(", "))),
            GroupMode::Provider => String::new(),
        };
        let _ = writeln!(
            out,
            "<li><a class='row' href='{}'><div><strong>{}</strong>{}</div>\
             <div class='stats'>{} files • {} missing • {} rows{}</div></a></li>",
            escape_html(&p.page),
            escape_html(&p.label),
            key_pill,
            p.counts.found,
            p.counts.missing,
            p.counts.total,
            engines
        );
    }
    out.push_str("</ul>\n</div>\n");

    if !duplicates.is_empty() {
        let extra: usize = duplicates.values().map(Vec::len).sum();
        let _ = writeln!(
            out,
            "<p class='dupe'>Note: duplicate audio basenames detected ({} names, {} extra occurrences). \
             The first encountered file was used for linking. Consider deduping.</p>",
            duplicates.len(),
            extra
        );
        out.push_str("<details class='dupe'><summary>Shadowed files</summary>\n<ul>\n");
        for (name, shadowed) in duplicates {
            let _ = writeln!(
                out,
                "<li><code>{}</code>: {}</li>",
                escape_html(name),
                escape_html(&shadowed.join(", "))
            );
        }
        out.push_str("</ul>\n</details>\n");
    }

    let _ = write!(
        out,
        "<p class='stats'>Generated on {}.</p>\n</div>\n</body>\n</html>\n",
        escape_html(generated_at)
    );
    out
}
