// Text rendering for tool output. Everything here is a pure function of its
// inputs so identical upstream data always yields identical text.

use crate::types::{NodeListing, NpmSearchResponse, RateLimitInfo};
use chrono::DateTime;

/// Render the merged catalog, listing at most `preview_limit` names.
pub fn node_listing(listing: &NodeListing, preview_limit: usize) -> String {
    let total = listing.total();
    let per_source = listing
        .sources
        .iter()
        .map(|s| format!("{} from {}", s.nodes.len(), s.label))
        .collect::<Vec<_>>()
        .join(", ");

    let shown: Vec<&str> = listing.names().take(preview_limit).collect();
    let mut text = format!("Found {total} N8N nodes ({per_source}):\n\n{}", shown.join("\n"));

    let hidden = total - shown.len();
    if hidden > 0 {
        text.push_str(&format!("\n\n... and {hidden} more nodes."));
    }
    text
}

pub fn search_results(keyword: &str, matches: &[&str]) -> String {
    if matches.is_empty() {
        return format!("No nodes found containing '{keyword}'");
    }
    format!(
        "Found {} nodes containing '{keyword}':\n\n{}",
        matches.len(),
        matches.join("\n")
    )
}

pub fn node_not_found(name: &str) -> String {
    format!("Node '{name}' not found")
}

/// First `lines` lines of a node's source file
pub fn code_snippet(name: &str, lines: usize, content: &str) -> String {
    let head: Vec<&str> = content.split('\n').take(lines).collect();
    format!("First {lines} lines of {name}.node.ts:\n\n{}", head.join("\n"))
}

pub fn code_not_found(name: &str) -> String {
    format!("Could not fetch code for '{name}'")
}

pub fn community_nodes(search_text: &str, response: &NpmSearchResponse) -> String {
    if response.objects.is_empty() {
        return format!("No community N8N nodes found on npm for '{search_text}'");
    }

    let lines: Vec<String> = response
        .objects
        .iter()
        .map(|obj| {
            let pkg = &obj.package;
            format!(
                "- {} (v{}): {}",
                pkg.name,
                pkg.version.as_deref().unwrap_or("?"),
                pkg.description
                    .as_deref()
                    .filter(|d| !d.is_empty())
                    .unwrap_or("No description")
            )
        })
        .collect();

    format!("Community N8N Nodes on npm:\n\n{}", lines.join("\n"))
}

pub fn rate_limit(rate: &RateLimitInfo, using_token: bool) -> String {
    let limit = rate.limit.map_or_else(|| "N/A".to_string(), |v| v.to_string());
    let remaining = rate
        .remaining
        .map_or_else(|| "N/A".to_string(), |v| v.to_string());
    let reset = match rate.reset {
        Some(ts) => match DateTime::from_timestamp(ts, 0) {
            Some(at) => format!("{ts} (Unix timestamp, {})", at.to_rfc3339()),
            None => format!("{ts} (Unix timestamp)"),
        },
        None => "N/A".to_string(),
    };
    let token = if using_token {
        "Yes"
    } else {
        "No (60 req/hour limit)"
    };

    format!(
        "GitHub API Rate Limit Status:\n\
         - Limit: {limit} requests/hour\n\
         - Remaining: {remaining} requests\n\
         - Resets at: {reset}\n\
         - Using token: {token}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NpmPackage, NpmSearchObject};

    fn names(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{prefix}{i}")).collect()
    }

    #[test]
    fn test_listing_notes_empty_secondary_source() {
        let mut listing = NodeListing::default();
        listing.push("nodes-base", vec!["A".to_string()]);
        listing.push("langchain", Vec::new());

        assert_eq!(
            node_listing(&listing, 50),
            "Found 1 N8N nodes (1 from nodes-base, 0 from langchain):\n\nA"
        );
    }

    #[test]
    fn test_listing_truncates_to_preview() {
        let mut listing = NodeListing::default();
        listing.push("base", names("N", 3));
        listing.push("extra", names("X", 2));

        let text = node_listing(&listing, 4);
        assert!(text.starts_with("Found 5 N8N nodes (3 from base, 2 from extra):\n\n"));
        assert!(text.contains("N0\nN1\nN2\nX0"));
        assert!(!text.contains("X1"));
        assert!(text.ends_with("... and 1 more nodes."));
    }

    #[test]
    fn test_search_results() {
        assert_eq!(
            search_results("http", &["HTTPRequest"]),
            "Found 1 nodes containing 'http':\n\nHTTPRequest"
        );
        assert_eq!(search_results("zzz", &[]), "No nodes found containing 'zzz'");
    }

    #[test]
    fn test_code_snippet_takes_leading_lines() {
        let text = code_snippet("Slack", 2, "line1\nline2\nline3");
        assert_eq!(text, "First 2 lines of Slack.node.ts:\n\nline1\nline2");
    }

    #[test]
    fn test_community_nodes_fallbacks() {
        let response = NpmSearchResponse {
            objects: vec![
                NpmSearchObject {
                    package: NpmPackage {
                        name: "n8n-nodes-foo".to_string(),
                        version: Some("1.2.3".to_string()),
                        description: Some("Foo integration".to_string()),
                    },
                },
                NpmSearchObject {
                    package: NpmPackage {
                        name: "n8n-nodes-bar".to_string(),
                        version: None,
                        description: None,
                    },
                },
            ],
        };

        assert_eq!(
            community_nodes("n8n-nodes-", &response),
            "Community N8N Nodes on npm:\n\n\
             - n8n-nodes-foo (v1.2.3): Foo integration\n\
             - n8n-nodes-bar (v?): No description"
        );
    }

    #[test]
    fn test_rate_limit_without_token() {
        let text = rate_limit(&RateLimitInfo::default(), false);

        assert!(text.contains("- Limit: N/A requests/hour"));
        assert!(text.contains("- Resets at: N/A"));
        assert!(text.ends_with("- Using token: No (60 req/hour limit)"));
    }

    #[test]
    fn test_rate_limit_with_token() {
        let rate = RateLimitInfo {
            limit: Some(5000),
            remaining: Some(4990),
            reset: Some(1_700_000_000),
        };
        let text = rate_limit(&rate, true);

        assert!(text.contains("- Limit: 5000 requests/hour"));
        assert!(text.contains("- Remaining: 4990 requests"));
        assert!(text.contains("1700000000 (Unix timestamp, 2023-11-14T22:13:20+00:00)"));
        assert!(text.ends_with("- Using token: Yes"));
    }
}
