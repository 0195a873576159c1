//! Static HTML pages.
//!
//! Pages are assembled from constant markup on each request; the three
//! forms post JSON to the submission endpoints and follow the returned
//! `redirect`.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};

const STYLE: &str = r#"
* { box-sizing: border-box; margin: 0; padding: 0; }
body { background: #000; color: #fff; font-family: ui-monospace, Menlo, Consolas, monospace; line-height: 1.5; }
a { color: #fff; }
header, footer { border-color: #fff; border-style: solid; border-width: 0 0 4px; padding: 1.5rem; display: flex; justify-content: space-between; flex-wrap: wrap; gap: 1rem; }
footer { border-width: 4px 0 0; margin-top: 4rem; }
nav a { margin-right: 1.5rem; font-weight: 900; text-decoration: none; text-transform: uppercase; }
main { max-width: 960px; margin: 0 auto; padding: 4rem 1.5rem; }
h1 { font-size: clamp(3rem, 10vw, 6rem); font-weight: 900; letter-spacing: -0.05em; line-height: 1; text-transform: uppercase; margin-bottom: 2rem; }
h2 { font-size: 1.75rem; font-weight: 900; text-transform: uppercase; margin: 2.5rem 0 1rem; }
p { margin-bottom: 0.75rem; font-size: 1.125rem; }
.block { border: 4px solid #fff; padding: 2rem; margin-bottom: 2rem; }
.button { display: inline-block; background: #fff; color: #000; padding: 1rem 2rem; font-weight: 900; text-transform: uppercase; text-decoration: none; border: 4px solid #fff; cursor: pointer; font-family: inherit; font-size: 1.125rem; }
.button.ghost { background: transparent; color: #fff; }
form label { display: block; font-weight: 900; text-transform: uppercase; margin: 1.25rem 0 0.5rem; }
form input, form textarea { width: 100%; background: #000; color: #fff; border: 4px solid #fff; padding: 0.75rem; font-family: inherit; font-size: 1rem; }
form textarea { min-height: 7rem; }
form button { margin-top: 1.5rem; }
.form-error { color: #ff4d4d; font-weight: 900; margin-top: 1rem; min-height: 1.5rem; }
"#;

const FORM_SCRIPT: &str = r#"
document.querySelectorAll("form[data-endpoint]").forEach(function (form) {
  form.addEventListener("submit", async function (event) {
    event.preventDefault();
    var status = form.querySelector(".form-error");
    var button = form.querySelector("button");
    var body = {};
    new FormData(form).forEach(function (value, key) {
      if (String(value).trim() !== "") body[key] = String(value);
    });
    button.disabled = true;
    status.textContent = "";
    try {
      var res = await fetch(form.dataset.endpoint, {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify(body)
      });
      var data = await res.json().catch(function () { return {}; });
      if (res.ok && data.redirect) {
        window.location.href = data.redirect;
        return;
      }
      status.textContent = data.error || "SOMETHING BROKE. TRY AGAIN.";
    } catch (e) {
      status.textContent = "NETWORK ERROR. TRY AGAIN.";
    }
    button.disabled = false;
  });
});
"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | BRUTAL</title>
<style>{STYLE}</style>
</head>
<body>
<header>
  <a href="/" class="button">BRUTAL</a>
  <nav>
    <a href="/about">About</a>
    <a href="/reviews">Reviews</a>
    <a href="/feedback">Feedback</a>
    <a href="/contact">Contact</a>
  </nav>
</header>
<main>
{body}
</main>
<footer>
  <p>&copy; 2025 BRUTAL.RAW</p>
  <nav><a href="/privacy">Privacy</a><a href="/about">About</a></nav>
</footer>
<script>{FORM_SCRIPT}</script>
</body>
</html>"#
    )
}

/// Single-screen confirmation pages share one shape.
fn confirmation(title: &str, heading: &str, lines: &[&str]) -> String {
    let lines: String = lines.iter().map(|l| format!("<p>{}</p>", l)).collect();
    layout(
        title,
        &format!(
            r#"<h1>{heading}</h1>
<div class="block">{lines}</div>
<a href="/" class="button">BACK TO BRUTAL</a>"#
        ),
    )
}

const HOME_BODY: &str = r#"<h1>RAW.<br>BOLD.<br>BRUTAL.</h1>
<p>&gt; NO ILLUSIONS. NO COMPROMISE</p>
<p>&gt; NO SHORTCUTS</p>
<p>&gt; NO FILTERS</p>

<h2>[WHAT WE OFFER]</h2>
<div class="block">
  <p>&gt; Your unfiltered AI mentor</p>
  <p>&gt; Progress tracking that matters</p>
  <p>&gt; Truth without the cushion</p>
  <p>&gt; Built for you. Not the crowd</p>
</div>

<h2 id="cta-section">[JOIN THE WAITLIST]</h2>
<form class="block" data-endpoint="/api/waitlist">
  <label for="email">Email</label>
  <input id="email" name="email" type="email" required maxlength="254" autocomplete="email">
  <label for="name">Name (optional)</label>
  <input id="name" name="name" type="text" maxlength="100" autocomplete="name">
  <button type="submit" class="button">[JOIN NOW &rarr;]</button>
  <p class="form-error" role="alert"></p>
</form>"#;

const ABOUT_BODY: &str = r#"<h1>ABOUT</h1>
<p>NO SUGAR COATING. JUST TRUTH.</p>
<h2>[WHAT IS BRUTAL?]</h2>
<div class="block">
  <p>&gt; BRUTAL is not just an app. It's a philosophy.</p>
  <p>&gt; We strip away the noise, the filters, the fake positivity.</p>
  <p>&gt; What remains is raw, honest, transformative truth.</p>
</div>
<h2>[WHY BRUTAL?]</h2>
<div class="block">
  <p>&gt; Because gentle lies won't change your life.</p>
  <p>&gt; Because comfort zones are where dreams go to die.</p>
  <p>&gt; Because you deserve the unvarnished truth about your potential.</p>
</div>
<h2>[THE MISSION]</h2>
<div class="block">
  <p>&gt; To create tools that don't coddle.</p>
  <p>&gt; To build experiences that challenge.</p>
  <p>&gt; To deliver results that matter.</p>
</div>
<a href="/" class="button">BACK TO BRUTAL</a>"#;

const PRIVACY_BODY: &str = r#"<h1>PRIVACY</h1>
<p>RAW TRUTH ABOUT YOUR DATA</p>
<h2>[WHAT WE COLLECT]</h2>
<div class="block">
  <p>&gt; Email addresses (for waitlist and optional contact)</p>
  <p>&gt; Names (optional, when you provide them)</p>
  <p>&gt; Feedback, reviews, and opinions (what you submit)</p>
  <p>&gt; Basic technical data (IP address for rate limiting)</p>
</div>
<h2>[HOW WE PROTECT IT]</h2>
<div class="block">
  <p>&gt; Encrypted database connections</p>
  <p>&gt; Rate limiting to prevent abuse</p>
  <p>&gt; Input sanitization and validation</p>
  <p>&gt; No sharing with third parties</p>
</div>
<h2>[YOUR RIGHTS]</h2>
<div class="block">
  <p>&gt; Request deletion of your data</p>
  <p>&gt; Request a copy of what we have</p>
  <p>&gt; Opt out of communications anytime</p>
</div>
<h2>[COOKIES &amp; TRACKING]</h2>
<div class="block">
  <p>&gt; No tracking cookies</p>
  <p>&gt; No analytics</p>
  <p>&gt; Just essential functionality</p>
</div>
<a href="/" class="button">BACK TO BRUTAL</a>"#;

const CONTACT_BODY: &str = r#"<h1>CONTACT</h1>
<p>SPEAK YOUR MIND. WE'RE LISTENING.</p>
<div class="block">
  <p>&gt; Ideas, complaints, praise: the feedback form takes all of it.</p>
  <p>&gt; Tried BRUTAL? Leave a review.</p>
</div>
<a href="/feedback" class="button">GIVE FEEDBACK</a>
<a href="/reviews" class="button ghost">LEAVE A REVIEW</a>"#;

const FEEDBACK_BODY: &str = r#"<h1>FEEDBACK</h1>
<p>TELL US WHAT YOU REALLY THINK.</p>
<form class="block" data-endpoint="/api/feedback">
  <label for="name">Name (optional)</label>
  <input id="name" name="name" type="text" maxlength="100">
  <label for="email">Email (optional)</label>
  <input id="email" name="email" type="email" maxlength="254">
  <label for="ideas">Ideas</label>
  <textarea id="ideas" name="ideas" maxlength="1000"></textarea>
  <label for="views">Views</label>
  <textarea id="views" name="views" maxlength="1000"></textarea>
  <label for="suggestions">Suggestions</label>
  <textarea id="suggestions" name="suggestions" maxlength="1000"></textarea>
  <label for="wants">What do you want from BRUTAL?</label>
  <textarea id="wants" name="wants" maxlength="1000"></textarea>
  <button type="submit" class="button">[SEND IT &rarr;]</button>
  <p class="form-error" role="alert"></p>
</form>"#;

const REVIEWS_BODY: &str = r#"<h1>REVIEWS</h1>
<p>NO FILTER. JUST YOUR TAKE.</p>
<form class="block" data-endpoint="/api/reviews">
  <label for="name">Name (optional)</label>
  <input id="name" name="name" type="text" maxlength="100">
  <label for="email">Email (optional)</label>
  <input id="email" name="email" type="email" maxlength="254">
  <label for="review">Review</label>
  <textarea id="review" name="review" maxlength="1000"></textarea>
  <label for="idea_opinion">What do you think of the idea?</label>
  <textarea id="idea_opinion" name="idea_opinion" maxlength="1000"></textarea>
  <label for="suggestion">Suggestion (optional)</label>
  <textarea id="suggestion" name="suggestion" maxlength="1000"></textarea>
  <button type="submit" class="button">[LOCK IT IN &rarr;]</button>
  <p class="form-error" role="alert"></p>
</form>"#;

const NOT_FOUND_BODY: &str = r#"<h1>404</h1>
<p>PAGE NOT FOUND</p>
<div class="block"><p>&gt; THE BRUTAL TRUTH: THIS PAGE DOESN'T EXIST</p></div>
<a href="/" class="button">GO HOME</a>
<a href="/feedback" class="button ghost">REPORT ISSUE</a>"#;

pub async fn home() -> Html<String> {
    Html(layout("Raw. Bold. Brutal.", HOME_BODY))
}

pub async fn about() -> Html<String> {
    Html(layout("About", ABOUT_BODY))
}

pub async fn privacy() -> Html<String> {
    Html(layout("Privacy", PRIVACY_BODY))
}

pub async fn contact() -> Html<String> {
    Html(layout("Contact", CONTACT_BODY))
}

pub async fn feedback() -> Html<String> {
    Html(layout("Feedback", FEEDBACK_BODY))
}

pub async fn reviews() -> Html<String> {
    Html(layout("Reviews", REVIEWS_BODY))
}

pub async fn thanks() -> Html<String> {
    Html(confirmation(
        "You're in",
        "YOU'RE IN.",
        &["NO TURNING BACK.", "YOU'LL HEAR FROM US SOON.", "PREPARE YOURSELF."],
    ))
}

pub async fn already() -> Html<String> {
    Html(confirmation(
        "Already joined",
        "YOU'RE ALREADY<br>PART OF THIS.",
        &["SIT TIGHT.", "WE HAVEN'T FORGOTTEN YOU."],
    ))
}

pub async fn noted() -> Html<String> {
    Html(confirmation(
        "Noted",
        "NOTED.",
        &[
            "YOUR INPUT IS LOCKED IN.",
            "RAW AND UNFILTERED.",
            "THANKS FOR TELLING IT LIKE IT IS.",
        ],
    ))
}

pub async fn feedback_received() -> Html<String> {
    Html(confirmation(
        "Received",
        "RECEIVED.",
        &[
            "YOUR THOUGHTS ARE NOTED.",
            "RAW AND UNFILTERED.",
            "WE'LL BE IN TOUCH.",
        ],
    ))
}

/// Fallback for any unmatched path.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(layout("Not found", NOT_FOUND_BODY)))
}

/// Page routes, independent of the application state type.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(home))
        .route("/about", get(about))
        .route("/privacy", get(privacy))
        .route("/contact", get(contact))
        .route("/feedback", get(feedback))
        .route("/reviews", get(reviews))
        .route("/thanks", get(thanks))
        .route("/already", get(already))
        .route("/already-joined", get(already))
        .route("/noted", get(noted))
        .route("/feedback-received", get(feedback_received))
}
