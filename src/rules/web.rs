//! Browser-side rules
//!
//! XSS sinks, client-side storage of sensitive values, and disabled TLS
//! verification.

use crate::rules::Rule;

pub const WEB_RULES: &[Rule] = &[
    Rule::substrings(
        "react-dangerously-set-html",
        &["dangerouslySetInnerHTML"],
        "⚠️ Security Warning: dangerouslySetInnerHTML can lead to XSS vulnerabilities if used with untrusted content. \
Ensure all content is properly sanitized with an HTML sanitizer such as DOMPurify, or render it as text instead.",
    ),
    Rule::substrings(
        "document-write-xss",
        &["document.write"],
        "⚠️ Security Warning: document.write() can be exploited for XSS attacks and has performance issues. \
Use DOM manipulation methods like createElement() and appendChild() instead.",
    ),
    Rule::substrings(
        "inner-html-xss",
        &[".innerHTML =", ".innerHTML="],
        r#"⚠️ Security Warning: Setting innerHTML with untrusted content can lead to XSS vulnerabilities.

Instead of:
  el.innerHTML = userInput

Use textContent for plain text, or sanitize HTML first:
  el.textContent = userInput
  el.innerHTML = DOMPurify.sanitize(userInput)"#,
    ),
    Rule::substrings(
        "local-storage-sensitive-data",
        &["localStorage.setItem(", "sessionStorage.setItem("],
        r#"⚠️ Security Warning: Values written to localStorage or sessionStorage are readable by any script on the page, so a single XSS bug exposes them.

Do not keep auth tokens, session identifiers or personal data there.

Instead of:
  localStorage.setItem('authToken', token)

Let the server set the token as a cookie:
  Set-Cookie: session=...; HttpOnly; Secure; SameSite=Strict"#,
    ),
    Rule::substrings(
        "tls-verification-disabled",
        &[
            "rejectUnauthorized: false",
            "verify=False",
            "InsecureSkipVerify: true",
            "danger_accept_invalid_certs(true)",
        ],
        "⚠️ Security Warning: Disabling TLS certificate verification allows man-in-the-middle attacks. \
Fix the trust chain instead: point the client at the correct CA bundle (for example `verify=\"/path/to/ca.pem\"` \
in requests or the `ca` option in Node) rather than turning verification off.",
    ),
];
