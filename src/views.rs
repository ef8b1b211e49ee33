//! HTML pages served to people in a browser (install and OAuth result).

use htmlescape::{encode_attribute, encode_minimal};

fn page(title: &str, content: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n{content}\n</body>\n</html>\n",
        title = encode_minimal(title),
    )
}

/// Landing page with the "Add to Slack" button.
#[must_use]
pub fn install_page(authorize_url: &str) -> String {
    page(
        "Slack Relay",
        &format!(
            "<h1>Slack Relay</h1>\n\
             <p>Authorize the app once, then use <code>/relay</code> to post messages as yourself.</p>\n\
             <p><a href=\"{href}\">Add to Slack</a></p>",
            href = encode_attribute(authorize_url),
        ),
    )
}

#[must_use]
pub fn oauth_success_page(user_id: &str) -> String {
    page(
        "Slack Relay connected",
        &format!(
            "<h1>You're all set</h1>\n\
             <p>Authorized as <code>{user}</code>. You can close this window and use <code>/relay</code> in Slack.</p>",
            user = encode_minimal(user_id),
        ),
    )
}

#[must_use]
pub fn oauth_failure_page(reason: &str) -> String {
    page(
        "Slack Relay authorization failed",
        &format!(
            "<h1>Authorization failed</h1>\n<p>{reason}</p>\n\
             <p><a href=\"install\">Try again</a></p>",
            reason = encode_minimal(reason),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_page_escapes_ampersands_in_link() {
        let html = install_page("https://slack.com/oauth/v2/authorize?client_id=1&state=x");
        assert!(html.contains("Add to Slack"));
        assert!(html.contains("&amp;"));
        assert!(!html.contains("1&state"));
    }

    #[test]
    fn test_failure_page_escapes_reason() {
        let html = oauth_failure_page("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
