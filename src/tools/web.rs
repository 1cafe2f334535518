use chrono::Utc;
use serde::Serialize;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; BrandHouse/1.0)";
const MAX_RESULTS: usize = 5;
const MAX_PAGE_CHARS: usize = 20000;

#[derive(Debug, thiserror::Error)]
pub enum WebToolError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub total_results: usize,
    pub searched_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedPage {
    pub title: String,
    pub content: String,
    pub url: String,
    pub read_at: String,
}

/// Search the web via the DuckDuckGo HTML endpoint. No API key needed.
pub async fn web_search(query: &str) -> Result<SearchResults, WebToolError> {
    let encoded = urlencoding::encode(query);
    let url = format!("https://html.duckduckgo.com/html/?q={encoded}");

    let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        return Err(WebToolError::Status(response.status()));
    }
    let html = response.text().await?;

    let results = extract_ddg_results(&html);
    let total_results = results.len();
    Ok(SearchResults {
        query: query.to_string(),
        results,
        total_results,
        searched_at: Utc::now().to_rfc3339(),
    })
}

/// Fetch a page and reduce it to readable text.
pub async fn fetch_url(url: &str) -> Result<FetchedPage, WebToolError> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(std::time::Duration::from_secs(60))
        .build()?;

    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(WebToolError::Status(response.status()));
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = response.text().await?;

    let (title, mut content) = if content_type.contains("text/html") {
        (extract_title(&body), extract_text_from_html(&body))
    } else {
        (String::new(), body)
    };
    if content.chars().count() > MAX_PAGE_CHARS {
        content = content.chars().take(MAX_PAGE_CHARS).collect();
    }

    Ok(FetchedPage {
        title: if title.is_empty() {
            "无标题".to_string()
        } else {
            title
        },
        content,
        url: url.to_string(),
        read_at: Utc::now().to_rfc3339(),
    })
}

/// Pull result blocks out of the DuckDuckGo HTML response.
fn extract_ddg_results(html: &str) -> Vec<SearchResult> {
    let mut results = Vec::new();

    for chunk in html.split("class=\"result__body\"").skip(1) {
        if results.len() >= MAX_RESULTS {
            break;
        }

        let title = chunk
            .split("class=\"result__a\"")
            .nth(1)
            .and_then(|s| s.split('>').nth(1))
            .and_then(|s| s.split('<').next())
            .unwrap_or("");
        let snippet = chunk
            .split("class=\"result__snippet\"")
            .nth(1)
            .and_then(|s| s.split('>').nth(1))
            .and_then(|s| s.split('<').next())
            .unwrap_or("");
        let url = chunk
            .split("class=\"result__url\"")
            .nth(1)
            .and_then(|s| s.split('>').nth(1))
            .and_then(|s| s.split('<').next())
            .map(str::trim)
            .unwrap_or("");

        if !title.is_empty() {
            results.push(SearchResult {
                title: html_decode(title),
                url: url.to_string(),
                snippet: html_decode(snippet),
            });
        }
    }

    results
}

fn extract_title(html: &str) -> String {
    html.split("<title")
        .nth(1)
        .and_then(|s| s.split('>').nth(1))
        .and_then(|s| s.split("</title>").next())
        .map(|s| html_decode(s.trim()))
        .unwrap_or_default()
}

/// Strip script/style blocks and tags, then collapse whitespace.
fn extract_text_from_html(html: &str) -> String {
    let mut text = html.to_string();

    while let Some(start) = text.find("<script") {
        if let Some(end) = text[start..].find("</script>") {
            text = format!("{}{}", &text[..start], &text[start + end + 9..]);
        } else {
            break;
        }
    }
    while let Some(start) = text.find("<style") {
        if let Some(end) = text[start..].find("</style>") {
            text = format!("{}{}", &text[..start], &text[start + end + 8..]);
        } else {
            break;
        }
    }

    let mut stripped = String::new();
    let mut in_tag = false;
    for c in text.chars() {
        if c == '<' {
            in_tag = true;
        } else if c == '>' {
            in_tag = false;
            stripped.push(' ');
        } else if !in_tag {
            stripped.push(c);
        }
    }

    let collapsed: String = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    html_decode(&collapsed)
}

fn html_decode(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const DDG_SAMPLE: &str = r#"
        <div class="result__body">
            <a class="result__a" href="/l/?u=x">First &amp; Best</a>
            <a class="result__snippet" href="/l/?u=x">A useful snippet</a>
            <span class="result__url" href="x"> example.com/page </span>
        </div>
        <div class="result__body">
            <a class="result__a" href="/l/?u=y">Second</a>
            <a class="result__snippet" href="/l/?u=y">Another snippet</a>
            <span class="result__url" href="y"> example.org </span>
        </div>
    "#;

    #[test]
    fn test_extract_ddg_results() {
        let results = extract_ddg_results(DDG_SAMPLE);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "First & Best");
        assert_eq!(results[0].snippet, "A useful snippet");
        assert_eq!(results[0].url, "example.com/page");
        assert_eq!(results[1].title, "Second");
    }

    #[test]
    fn test_extract_ddg_results_caps_at_five() {
        let mut html = String::new();
        for i in 0..8 {
            html.push_str(&format!(
                "<div class=\"result__body\"><a class=\"result__a\" href=\"#\">Title {i}</a></div>"
            ));
        }
        assert_eq!(extract_ddg_results(&html).len(), 5);
    }

    #[test]
    fn test_extract_text_from_html() {
        let html = "<html><head><title>Page &amp; Title</title><style>.x{}</style>\
                    <script>var a = 1;</script></head>\
                    <body><h1>Hello</h1><p>World  of   brands</p></body></html>";
        let text = extract_text_from_html(html);
        assert!(text.contains("Hello"));
        assert!(text.contains("World of brands"));
        assert!(!text.contains("var a"));
        assert!(!text.contains(".x{}"));
    }

    #[test]
    fn test_extract_title() {
        let html = "<html><head><title> My &quot;Brand&quot; </title></head></html>";
        assert_eq!(extract_title(html), "My \"Brand\"");
    }

    #[test]
    fn test_search_results_serialize_camel_case() {
        let results = SearchResults {
            query: "q".into(),
            results: vec![],
            total_results: 0,
            searched_at: "2026-01-01T00:00:00Z".into(),
        };
        let json = serde_json::to_value(&results).unwrap();
        assert!(json.get("totalResults").is_some());
        assert!(json.get("searchedAt").is_some());
    }
}
