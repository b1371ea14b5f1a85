// src/render.rs

use crate::listing::{Catalog, Listing};
use crate::markdown;
use crate::models::{Entry, TaggedEntry};
use crate::tags::{self, TagCount};

/// Escape text for HTML element content and quoted attributes.
pub fn h(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// `base?k=v&...`, leaving out empty values. Just `base` when nothing is left.
pub fn build_url(base: &str, params: &[(&str, String)]) -> String {
    let kept: Vec<(&str, &str)> = params
        .iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| (*k, v.as_str()))
        .collect();
    match serde_urlencoded::to_string(&kept) {
        Ok(q) if !q.is_empty() => format!("{base}?{q}"),
        _ => base.to_string(),
    }
}

fn page_head(title: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="ja">
<head>
  <meta charset="utf-8">
  <title>{}</title>
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <link rel="stylesheet" href="/css/style.css">
</head>
<body>
"#,
        h(title)
    )
}

const PAGE_FOOT: &str = "</body>\n</html>\n";

fn tag_suffix(selected_tag: &str) -> String {
    if selected_tag.is_empty() {
        String::new()
    } else {
        format!(" / タグ: {}", h(selected_tag))
    }
}

fn tag_pills(base: &str, counts: &[TagCount], total: usize, selected_tag: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "<a class=\"pill {}\" href=\"{}\">全て <small>({})</small></a>\n",
        if selected_tag.is_empty() { "active" } else { "" },
        h(base),
        total
    ));
    for c in counts {
        out.push_str(&format!(
            "<a class=\"pill {}\" href=\"{}\">{} <small>({})</small></a>\n",
            if selected_tag == c.tag { "active" } else { "" },
            h(&build_url(base, &[("cat", c.tag.clone())])),
            h(&c.tag),
            c.count
        ));
    }
    out
}

fn entry_link(entry: &TaggedEntry, href: &str, is_active: bool) -> String {
    format!(
        "<a class=\"entry {}\" href=\"{}\">\n  <div><strong>{}</strong></div>\n  <div class=\"muted\">{} / {}</div>\n</a>\n",
        if is_active { "active" } else { "" },
        h(href),
        h(&entry.display_title),
        h(&entry.created_at),
        h(&entry.tags.join(", "))
    )
}

fn entry_detail(entry: &Entry) -> String {
    let parsed = tags::parse_title(&entry.title);
    format!(
        "<h1 style=\"margin:0 0 6px 0;\">{}</h1>\n<div class=\"muted\">タグ: {} / 作成: {} / 更新: {}</div>\n<div class=\"card\">\n{}</div>\n",
        h(&parsed.display_title),
        h(&parsed.tags.join(", ")),
        h(&entry.created_at),
        h(&entry.updated_at),
        markdown::to_html(&entry.body)
    )
}

fn pager_arrow(label: &str, href: Option<String>) -> String {
    match href {
        Some(href) => format!("<a class=\"btn\" href=\"{}\">{}</a>", h(&href), label),
        None => format!("<span class=\"btn\" style=\"opacity:.4; cursor:default;\">{label}</span>"),
    }
}

/// Everything the public index shows.
pub struct IndexPage<'a> {
    pub listing: &'a Listing,
    pub selected_tag: &'a str,
    /// The active entry and its id, after fallback.
    pub active: Option<&'a (i64, Entry)>,
}

pub fn index_page(view: &IndexPage<'_>) -> String {
    let listing = view.listing;
    let tag = view.selected_tag;
    let page_params = |p: usize| vec![("cat", tag.to_string()), ("p", p.to_string())];

    let newer = listing
        .has_newer()
        .then(|| build_url("/", &page_params(listing.page - 1)));
    let older = listing
        .has_older()
        .then(|| build_url("/", &page_params(listing.page + 1)));

    let mut out = page_head("日記");
    out.push_str(&format!(
        "<header>\n<div><strong>日記</strong> <span class=\"muted\">閲覧ページ{}</span></div>\n<div class=\"muted\"><a href=\"/admin\">管理</a></div>\n</header>\n",
        tag_suffix(tag)
    ));

    out.push_str("<div class=\"wrap\">\n<aside>\n<div>\n");
    out.push_str(&tag_pills(
        "/",
        &listing.catalog.tag_counts,
        listing.catalog.total_entries,
        tag,
    ));
    out.push_str("</div>\n");

    out.push_str(&format!(
        "<div class=\"row\" style=\"margin-top: 10px; justify-content: space-between;\">\n<div>{}</div>\n<div class=\"muted\" style=\"align-self:center;\">{} / {}</div>\n<div>{}</div>\n</div>\n",
        pager_arrow("← 新しい", newer),
        listing.page,
        listing.total_pages,
        pager_arrow("古い →", older)
    ));

    out.push_str("<div style=\"margin-top: 10px;\">\n");
    let items = listing.page_items();
    if items.is_empty() {
        out.push_str("<p class=\"muted\">該当タグの投稿がありません。</p>\n");
    } else {
        let active_id = view.active.map(|(id, _)| *id);
        for e in items {
            let href = build_url(
                "/",
                &[
                    ("id", e.id.to_string()),
                    ("cat", tag.to_string()),
                    ("p", listing.page.to_string()),
                ],
            );
            out.push_str(&entry_link(e, &href, active_id == Some(e.id)));
        }
    }
    out.push_str("</div>\n</aside>\n<main>\n");

    match view.active {
        Some((_, entry)) => out.push_str(&entry_detail(entry)),
        None => out.push_str(
            "<h1 style=\"margin:0;\">日記</h1>\n<p class=\"muted\">まだ投稿がありません。</p>\n",
        ),
    }

    out.push_str("</main>\n</div>\n");
    out.push_str(PAGE_FOOT);
    out
}

/// Login screen shown to anyone without an admin session.
pub fn login_page(csrf: &str, flash: Option<&str>) -> String {
    let mut out = page_head("管理ログイン");
    out.push_str("<h1>管理ログイン</h1>\n<p class=\"muted\"><a href=\"/\">← 閲覧ページへ</a></p>\n<div class=\"card\">\n");
    if let Some(msg) = flash {
        out.push_str(&format!("<p class=\"error\">{}</p>\n", h(msg)));
    }
    out.push_str(&format!(
        r#"<form method="post" action="/admin">
  <input type="hidden" name="csrf" value="{}">
  <input type="hidden" name="action" value="login">
  <p>
    <label>管理パスワード</label><br>
    <input type="password" name="password" required>
  </p>
  <button class="btn" type="submit">ログイン</button>
</form>
</div>
"#,
        h(csrf)
    ));
    out.push_str(PAGE_FOOT);
    out
}

/// Values prefilled in the entry form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    pub date: String,
    pub time: String,
    pub title: String,
    pub body: String,
}

/// Everything the admin screen shows.
pub struct AdminPage<'a> {
    pub catalog: &'a Catalog,
    pub selected_tag: &'a str,
    pub selected_id: i64,
    pub active: Option<&'a Entry>,
    /// `true` shows the edit form for `active`, otherwise the new-entry form.
    pub editing: bool,
    pub form: FormValues,
    pub flash: Option<&'a str>,
    pub csrf: &'a str,
}

pub fn admin_page(view: &AdminPage<'_>) -> String {
    let tag = view.selected_tag;
    let cat = ("cat", tag.to_string());
    let csrf = h(view.csrf);

    let mut out = page_head("日記 管理");
    out.push_str(&format!(
        "<header>\n<div><strong>日記 管理</strong> <span class=\"muted\">（ログイン中{}）</span></div>\n<div class=\"row\">\n<a class=\"btn\" href=\"{}\">閲覧</a>\n<a class=\"btn\" href=\"/admin?logout=1\">ログアウト</a>\n</div>\n</header>\n",
        tag_suffix(tag),
        h(&build_url("/", &[cat.clone()]))
    ));

    out.push_str("<div class=\"wrap\">\n<aside>\n<div class=\"row\">\n");
    out.push_str(&format!(
        "<a class=\"btn\" href=\"{}\">新規</a>\n",
        h(&build_url("/admin", &[("mode", "new".to_string()), cat.clone()]))
    ));
    if view.active.is_some() {
        out.push_str(&format!(
            "<a class=\"btn\" href=\"{}\">編集</a>\n",
            h(&build_url(
                "/admin",
                &[
                    ("id", view.selected_id.to_string()),
                    ("mode", "edit".to_string()),
                    cat.clone(),
                ]
            ))
        ));
    }
    out.push_str("</div>\n<div style=\"margin-top:10px;\">\n");
    out.push_str(&tag_pills(
        "/admin",
        &view.catalog.tag_counts,
        view.catalog.total_entries,
        tag,
    ));
    out.push_str("</div>\n<div style=\"margin-top: 10px;\">\n");

    if view.catalog.filtered.is_empty() {
        out.push_str("<p class=\"muted\">該当タグの投稿がありません。</p>\n");
    } else {
        for e in &view.catalog.filtered {
            let href = build_url("/admin", &[("id", e.id.to_string()), cat.clone()]);
            let is_active = view.active.is_some() && e.id == view.selected_id;
            out.push_str(&entry_link(e, &href, is_active));
        }
    }
    out.push_str("</div>\n</aside>\n<main>\n");

    if let Some(msg) = view.flash {
        out.push_str(&format!("<div class=\"error\">{}</div>\n", h(msg)));
    }

    match view.active {
        Some(entry) => {
            out.push_str(&entry_detail(entry));
            out.push_str(&format!(
                r#"<div class="card">
<form method="post" onsubmit="return confirm('削除しますか？');" style="margin:0;">
  <input type="hidden" name="csrf" value="{csrf}">
  <input type="hidden" name="action" value="delete">
  <input type="hidden" name="id" value="{}">
  <button class="btn danger" type="submit">削除</button>
</form>
</div>
"#,
                view.selected_id
            ));
        }
        None => out.push_str(
            "<h1 style=\"margin:0;\">管理ページ</h1>\n<p class=\"muted\">左から選ぶか、新規で投稿してください。</p>\n",
        ),
    }

    out.push_str("<div class=\"card\">\n");
    let (heading, action, submit) = if view.editing && view.active.is_some() {
        ("編集", "update", "更新")
    } else {
        ("新規投稿", "create", "保存")
    };
    out.push_str(&format!(
        "<h2 style=\"margin-top:0;\">{heading}</h2>\n<p class=\"muted\">タイトルに <code>[tag]</code> を複数入れられます（例: <code>散歩[health][work]</code>）。</p>\n"
    ));
    out.push_str(&format!(
        r#"<form method="post">
  <input type="hidden" name="csrf" value="{csrf}">
  <input type="hidden" name="action" value="{action}">
"#
    ));
    if action == "update" {
        out.push_str(&format!(
            "  <input type=\"hidden\" name=\"id\" value=\"{}\">\n",
            view.selected_id
        ));
    }
    out.push_str(&format!(
        r#"  <p>
    <label>日付</label><br>
    <input type="date" name="entry_date" value="{}">
  </p>
  <p>
    <label>時刻（任意）</label><br>
    <input type="time" name="entry_time" value="{}">
  </p>
  <p>
    <label>タイトル（[tag]を複数OK）</label><br>
    <input type="text" name="title" value="{}" required>
  </p>
  <p>
    <label>本文（Markdown）</label><br>
    <textarea name="body" required>{}</textarea>
  </p>
"#,
        h(&view.form.date),
        h(&view.form.time),
        h(&view.form.title),
        h(&view.form.body)
    ));
    if action == "update" {
        out.push_str(&format!(
            "  <div class=\"row\">\n    <button class=\"btn primary\" type=\"submit\">{submit}</button>\n    <a class=\"btn\" href=\"{}\">キャンセル</a>\n  </div>\n",
            h(&build_url(
                "/admin",
                &[("id", view.selected_id.to_string()), cat.clone()]
            ))
        ));
    } else {
        out.push_str(&format!(
            "  <button class=\"btn primary\" type=\"submit\">{submit}</button>\n"
        ));
    }
    out.push_str("</form>\n</div>\n</main>\n</div>\n");
    out.push_str(PAGE_FOOT);
    out
}

pub const STYLESHEET: &str = r#"body { font-family: system-ui, sans-serif; margin: 0; color: #222; background: #fafafa; }
header { display: flex; justify-content: space-between; align-items: center; padding: 12px 20px; border-bottom: 1px solid #ddd; background: #fff; }
h1 { font-size: 1.5em; }
.wrap { display: flex; gap: 20px; padding: 20px; }
aside { width: 320px; flex-shrink: 0; }
main { flex: 1; min-width: 0; }
.row { display: flex; gap: 8px; }
.muted { color: #777; font-size: .9em; }
.card { background: #fff; border: 1px solid #ddd; border-radius: 6px; padding: 14px; margin-top: 12px; }
.btn { display: inline-block; padding: 6px 12px; border: 1px solid #ccc; border-radius: 4px; background: #fff; color: #222; text-decoration: none; cursor: pointer; font-size: .9em; }
.btn.primary { background: #2d6cdf; border-color: #2d6cdf; color: #fff; }
.btn.danger { background: #d33; border-color: #d33; color: #fff; }
.pill { display: inline-block; margin: 0 4px 6px 0; padding: 3px 10px; border: 1px solid #ccc; border-radius: 999px; text-decoration: none; color: #333; font-size: .85em; }
.pill.active { background: #333; border-color: #333; color: #fff; }
.entry { display: block; padding: 8px 10px; border-bottom: 1px solid #eee; text-decoration: none; color: inherit; }
.entry.active { background: #eef3ff; }
.error { color: #b00; background: #fee; border: 1px solid #fbb; padding: 8px 10px; border-radius: 4px; }
input[type=text], input[type=password], textarea { width: 100%; box-sizing: border-box; padding: 6px; }
textarea { min-height: 240px; }
pre { overflow-x: auto; background: #f4f4f4; padding: 10px; }
@media (max-width: 760px) { .wrap { flex-direction: column; } aside { width: auto; } }
"#;
