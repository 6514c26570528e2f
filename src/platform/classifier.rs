//! URL to platform classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Social-media platforms the backend knows how to extract from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Threads,
    Xiaohongshu,
    /// Douyin and its international TikTok domain.
    Douyin,
}

/// Host fragments per platform, in match order. First match wins.
const HOST_RULES: &[(Platform, &[&str])] = &[
    (Platform::Threads, &["threads.net", "threads.com"]),
    (Platform::Xiaohongshu, &["xiaohongshu.com", "xhslink.com"]),
    (Platform::Douyin, &["douyin.com", "tiktok.com"]),
];

impl Platform {
    /// Every supported platform, in classification order.
    pub const ALL: [Platform; 3] = [Platform::Threads, Platform::Xiaohongshu, Platform::Douyin];

    /// Identifier used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Threads => "threads",
            Platform::Xiaohongshu => "xiaohongshu",
            Platform::Douyin => "douyin",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Threads => "Threads",
            Platform::Xiaohongshu => "Xiaohongshu",
            Platform::Douyin => "Douyin",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "threads" => Ok(Platform::Threads),
            "xiaohongshu" => Ok(Platform::Xiaohongshu),
            "douyin" => Ok(Platform::Douyin),
            _ => Err(format!("Unknown platform: {}", s)),
        }
    }
}

/// Classify a URL by substring search over its lowercased text.
///
/// Never fails: malformed and blank input simply yields `None`.
pub fn classify(url: &str) -> Option<Platform> {
    let lowered = url.to_lowercase();
    HOST_RULES
        .iter()
        .find(|(_, hosts)| hosts.iter().any(|host| lowered.contains(host)))
        .map(|(platform, _)| *platform)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threads_urls() {
        assert_eq!(
            classify("https://www.threads.net/@user/post/123"),
            Some(Platform::Threads)
        );
        assert_eq!(classify("https://threads.net/t/ABC123"), Some(Platform::Threads));
        assert_eq!(
            classify("https://www.threads.com/@user/post/C1"),
            Some(Platform::Threads)
        );
    }

    #[test]
    fn test_xiaohongshu_urls() {
        assert_eq!(
            classify("https://www.xiaohongshu.com/explore/123"),
            Some(Platform::Xiaohongshu)
        );
        assert_eq!(
            classify("https://xhslink.com/abc123"),
            Some(Platform::Xiaohongshu)
        );
    }

    #[test]
    fn test_douyin_and_tiktok_urls() {
        for url in [
            "https://www.douyin.com/video/123",
            "https://v.douyin.com/abc123",
            "https://www.tiktok.com/@user/video/123",
            "https://vm.tiktok.com/abc123",
        ] {
            assert_eq!(classify(url), Some(Platform::Douyin), "{url}");
        }
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("HTTPS://WWW.TIKTOK.COM/@X"), Some(Platform::Douyin));
        assert_eq!(classify("https://XhsLink.com/a"), Some(Platform::Xiaohongshu));
    }

    #[test]
    fn test_first_match_wins() {
        // A Threads post linking to TikTok is still a Threads URL.
        assert_eq!(
            classify("https://threads.net/@u/post/1?ref=tiktok.com"),
            Some(Platform::Threads)
        );
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("   "), None);
        assert_eq!(classify("https://www.youtube.com/watch?v=123"), None);
        assert_eq!(classify("https://www.instagram.com/p/123"), None);
        assert_eq!(classify("https://example.com"), None);
    }

    #[test]
    fn test_malformed_input_does_not_panic() {
        assert_eq!(classify("::::\u{0}%%%"), None);
        assert_eq!(classify("not a url but douyin.com"), Some(Platform::Douyin));
    }

    #[test]
    fn test_round_trip_names() {
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>(), Ok(platform));
        }
        assert!("youtube".parse::<Platform>().is_err());
    }
}
