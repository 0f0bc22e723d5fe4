//! Page templates.

use crate::controller::{Notice, NoticeKind, ViewSnapshot};
use crate::render::{PREVIEW_PLACEHOLDER, Tab, escape_html, preview_frame};
use crate::session::Identity;

const PROMPT_PLACEHOLDER: &str = "e.g., Create a modern navigation bar with a logo, menu items, and a search box. Use a gradient blue color scheme with smooth hover effects.";

const APP_CSS: &str = "\
*{box-sizing:border-box}\
body{margin:0;font-family:system-ui,sans-serif;background:#f8fafc;color:#0f172a}\
header{display:flex;align-items:center;justify-content:space-between;padding:1rem 2rem;background:#1e293b;color:#f8fafc}\
header h1{font-size:1.25rem;margin:0}\
header form{display:inline}\
main{max-width:72rem;margin:0 auto;padding:2rem}\
.subtitle{color:#64748b;margin-top:0}\
.grid{display:grid;grid-template-columns:1fr 1fr;gap:2rem}\
.card{background:#fff;border-radius:1rem;padding:1.5rem;box-shadow:0 1px 3px rgba(0,0,0,.1)}\
textarea{width:100%;min-height:9rem;padding:.75rem;border:1px solid #cbd5e1;border-radius:.5rem;font:inherit}\
input{width:100%;padding:.6rem;border:1px solid #cbd5e1;border-radius:.5rem;font:inherit;margin-bottom:1rem}\
button{cursor:pointer;border:0;border-radius:.5rem;padding:.6rem 1.2rem;font:inherit}\
button:disabled{opacity:.5;cursor:not-allowed}\
.button-primary{background:#2563eb;color:#fff}\
.button-secondary{background:#e2e8f0;color:#0f172a}\
.link{background:none;color:inherit;text-decoration:underline;padding:0}\
.tabs{display:flex;gap:.5rem;margin-bottom:.5rem}\
.tab{background:#e2e8f0}\
.tab.active{background:#2563eb;color:#fff}\
pre{background:#0f172a;color:#e2e8f0;padding:1rem;border-radius:.5rem;min-height:10rem;overflow:auto;white-space:pre-wrap}\
.loading{display:flex;align-items:center;gap:.75rem;color:#2563eb}\
.spinner{width:1.25rem;height:1.25rem;border:3px solid #bfdbfe;border-top-color:#2563eb;border-radius:50%;animation:spin 1s linear infinite}\
@keyframes spin{to{transform:rotate(360deg)}}\
.notice{padding:.75rem 1rem;border-radius:.5rem;margin-bottom:1rem}\
.notice.error{background:#fee2e2;color:#991b1b}\
.notice.info{background:#dcfce7;color:#166534}\
.preview-frame{width:100%;height:300px;border:none;background:#fff}\
.preview-empty{text-align:center;color:#64748b;padding:40px 0}\
.auth{max-width:24rem;margin:3rem auto}";

/// Shared page shell.
fn html_shell(title: &str, identity: Option<&Identity>, content: &str, refresh: bool) -> String {
    let account = identity.map_or_else(String::new, |identity| {
        format!(
            r#"<div><span>{}</span> <form method="post" action="/logout"><button type="submit" class="link">Log out</button></form></div>"#,
            escape_html(&identity.name)
        )
    });
    let refresh = if refresh {
        r#"<meta http-equiv="refresh" content="2">"#
    } else {
        ""
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    {refresh}
    <title>{title} - UI Forge</title>
    <style>{APP_CSS}</style>
</head>
<body>
    <header>
        <h1>AI HTML/CSS Generator</h1>
        {account}
    </header>
    <main>
        {content}
    </main>
</body>
</html>"#
    )
}

fn notice_html(notice: Option<&Notice>) -> String {
    notice.map_or_else(String::new, |notice| {
        let class = match notice.kind {
            NoticeKind::Error => "error",
            NoticeKind::Info => "info",
        };
        format!(
            r#"<div class="notice {class}" role="alert">{}</div>"#,
            escape_html(&notice.text)
        )
    })
}

fn disabled(enabled: bool) -> &'static str {
    if enabled { "" } else { " disabled" }
}

/// Generator view.
pub fn generator_page(identity: &Identity, view: &ViewSnapshot) -> String {
    let mut content = format!(
        r#"<p class="subtitle">Transform your ideas into beautiful code in seconds</p>
{notice}
<div class="grid">
<section class="card">
    <h2>Design Your Vision</h2>
    <p class="subtitle">Describe the web element or page you want to create, and the generator will write the code for you.</p>
    <form method="post" action="/generate">
        <textarea name="prompt" placeholder="{placeholder}">{prompt}</textarea>
        <button type="submit" class="button-primary"{generate_disabled}>{generate_label}</button>
    </form>"#,
        notice = notice_html(view.notice.as_ref()),
        placeholder = escape_html(PROMPT_PLACEHOLDER),
        prompt = escape_html(&view.prompt),
        generate_disabled = disabled(view.can_generate),
        generate_label = if view.is_loading() { "Generating..." } else { "Generate Code" },
    );

    if view.is_loading() {
        content.push_str(
            r#"
    <div class="loading"><div class="spinner"></div><p>Working on your design...</p></div>"#,
        );
    }

    let tab_button = |tab: Tab, label: &str| {
        let active = if view.tab == tab { " active" } else { "" };
        format!(
            r#"<form method="post" action="/tab/{}"><button type="submit" class="tab{active}">{label}</button></form>"#,
            tab.as_str()
        )
    };
    let visible = |tab: Tab| if view.tab == tab { "block" } else { "none" };

    let panes = format!(
        r#"
</section>
<section class="card">
    <div class="tabs">{html_tab}{css_tab}</div>
    <pre id="pane-html" style="display:{html_display}">{html}</pre>
    <pre id="pane-css" style="display:{css_display}">{css}</pre>
    <form method="post" action="/copy">
        <button type="submit" class="button-secondary"{copy_disabled}>{copy_label}</button>
    </form>
    <h3>Live Preview</h3>
    {preview}
</section>
</div>"#,
        html_tab = tab_button(Tab::Html, "HTML"),
        css_tab = tab_button(Tab::Css, "CSS"),
        html_display = visible(Tab::Html),
        css_display = visible(Tab::Css),
        html = escape_html(&view.html_text),
        css = escape_html(&view.css_text),
        copy_disabled = disabled(view.can_copy),
        copy_label = view.copy_label,
        preview = if view.rendered.has_preview() {
            preview_frame(&view.rendered.preview_document)
        } else {
            format!(r#"<div class="preview-empty"><p>{PREVIEW_PLACEHOLDER}</p></div>"#)
        },
    );
    content.push_str(&panes);

    html_shell("Generator", Some(identity), &content, view.is_loading())
}

/// Login view.
pub fn login_page(notice: Option<&Notice>, username: &str) -> String {
    let content = format!(
        r#"<section class="card auth">
    <h2>Log in</h2>
    {notice}
    <form method="post" action="/login">
        <label for="username">Username</label>
        <input id="username" name="username" value="{username}" autocomplete="username" required>
        <label for="password">Password</label>
        <input id="password" name="password" type="password" autocomplete="current-password" required>
        <button type="submit" class="button-primary">Log in</button>
    </form>
    <p>No account yet? <a href="/register">Register</a></p>
</section>"#,
        notice = notice_html(notice),
        username = escape_html(username),
    );
    html_shell("Log in", None, &content, false)
}

/// Registration view.
pub fn register_page(notice: Option<&Notice>, username: &str, email: &str) -> String {
    let content = format!(
        r#"<section class="card auth">
    <h2>Create an account</h2>
    {notice}
    <form method="post" action="/register">
        <label for="username">Username</label>
        <input id="username" name="username" value="{username}" autocomplete="username" required>
        <label for="email">Email</label>
        <input id="email" name="email" type="email" value="{email}" autocomplete="email">
        <label for="password">Password</label>
        <input id="password" name="password" type="password" autocomplete="new-password" required>
        <button type="submit" class="button-primary">Register</button>
    </form>
    <p>Already registered? <a href="/login">Log in</a></p>
</section>"#,
        notice = notice_html(notice),
        username = escape_html(username),
        email = escape_html(email),
    );
    html_shell("Register", None, &content, false)
}
