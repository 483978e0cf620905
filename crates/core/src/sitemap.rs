//! XML sitemap for search engines: the static site pages followed by one
//! entry per active public memorial.

use crate::types::Timestamp;

/// How often a page is expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFreq {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
        }
    }
}

/// A static page of the public site.
#[derive(Debug, Clone, Copy)]
pub struct StaticPage {
    pub path: &'static str,
    pub priority: f32,
    pub changefreq: ChangeFreq,
}

pub const STATIC_PAGES: &[StaticPage] = &[
    StaticPage { path: "/", priority: 1.0, changefreq: ChangeFreq::Weekly },
    StaticPage { path: "/memoriais", priority: 0.9, changefreq: ChangeFreq::Daily },
    StaticPage { path: "/sobre", priority: 0.7, changefreq: ChangeFreq::Monthly },
    StaticPage { path: "/contato", priority: 0.6, changefreq: ChangeFreq::Monthly },
    StaticPage { path: "/planos", priority: 0.8, changefreq: ChangeFreq::Monthly },
];

/// The fields of a memorial the sitemap needs.
#[derive(Debug, Clone)]
pub struct SitemapMemorial {
    pub slug: String,
    pub is_historical: bool,
    pub updated_at: Timestamp,
}

/// Render the full `urlset` document.
pub fn render_sitemap(base_url: &str, memorials: &[SitemapMemorial]) -> String {
    let base = base_url.trim_end_matches('/');
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for page in STATIC_PAGES {
        push_url(
            &mut xml,
            &format!("{base}{}", page.path),
            None,
            page.changefreq,
            page.priority,
        );
    }

    for m in memorials {
        let priority = if m.is_historical { 0.9 } else { 0.8 };
        let lastmod = m.updated_at.format("%Y-%m-%d").to_string();
        push_url(
            &mut xml,
            &format!("{base}/m/{}", m.slug),
            Some(&lastmod),
            ChangeFreq::Weekly,
            priority,
        );
    }

    xml.push_str("</urlset>\n");
    xml
}

fn push_url(xml: &mut String, loc: &str, lastmod: Option<&str>, freq: ChangeFreq, priority: f32) {
    xml.push_str("  <url>\n");
    xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(loc)));
    if let Some(lastmod) = lastmod {
        xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
    }
    xml.push_str(&format!("    <changefreq>{}</changefreq>\n", freq.as_str()));
    xml.push_str(&format!("    <priority>{priority:.1}</priority>\n"));
    xml.push_str("  </url>\n");
}

/// Escape the five XML special characters.
pub fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;

    #[test]
    fn static_pages_come_first() {
        let xml = render_sitemap("https://portaldalembranca.com.br/", &[]);
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<loc>https://portaldalembranca.com.br/</loc>"));
        assert!(xml.contains("<loc>https://portaldalembranca.com.br/memoriais</loc>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert_eq!(xml.matches("<url>").count(), STATIC_PAGES.len());
    }

    #[test]
    fn memorial_entries_use_historical_priority() {
        let updated = Utc.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap();
        let xml = render_sitemap(
            "https://x.test",
            &[
                SitemapMemorial { slug: "ana".into(), is_historical: true, updated_at: updated },
                SitemapMemorial { slug: "bia".into(), is_historical: false, updated_at: updated },
            ],
        );
        let ana = xml.split("<loc>https://x.test/m/ana</loc>").nth(1).unwrap();
        assert!(ana.contains("<lastmod>2026-03-14</lastmod>"));
        assert!(ana.contains("<priority>0.9</priority>"));
        let bia = xml.split("<loc>https://x.test/m/bia</loc>").nth(1).unwrap();
        assert!(bia.contains("<priority>0.8</priority>"));
    }

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape_xml("a&b<c>\"d'"), "a&amp;b&lt;c&gt;&quot;d&apos;");
    }
}
