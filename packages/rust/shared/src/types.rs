//! Content-type registry: every content domain the seeder knows about.
//!
//! The table is fixed at build time. [`ContentDomain::ALL`] is also the run
//! order; singletons go first so navigation and page shells exist before the
//! collections that link to them.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::SeedError;

// ---------------------------------------------------------------------------
// NaturalKey
// ---------------------------------------------------------------------------

/// How an existing remote document is recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaturalKey {
    /// `slug.current`, taken from the entry's key in the source file.
    Slug,
    /// The document `title`.
    Title,
    /// A fixed document id; the domain holds exactly one document.
    Singleton(&'static str),
}

impl NaturalKey {
    /// Dotted field path the store is queried on.
    pub fn field(&self) -> &'static str {
        match self {
            NaturalKey::Slug => "slug.current",
            NaturalKey::Title => "title",
            NaturalKey::Singleton(_) => "_id",
        }
    }
}

// ---------------------------------------------------------------------------
// ContentDomain
// ---------------------------------------------------------------------------

/// A category of site content with its own source file and document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentDomain {
    Navbar,
    Footer,
    Home,
    About,
    Contact,
    Seo,
    WebDevelopment,
    SocialMedia,
    PaidAds,
    Branding,
    Portfolio,
    CaseStudies,
    Testimonials,
    Team,
    Pricing,
    Faq,
    Blog,
}

/// Static registry entry for a content domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainSpec {
    pub domain: ContentDomain,
    /// Identifier used on the command line and in `_key` prefixes.
    pub id: &'static str,
    /// Source file name inside the data directory.
    pub file: &'static str,
    /// Remote document `_type`.
    pub doc_type: &'static str,
    pub natural_key: NaturalKey,
}

impl ContentDomain {
    /// Every domain, in run order.
    pub const ALL: [ContentDomain; 17] = [
        ContentDomain::Navbar,
        ContentDomain::Footer,
        ContentDomain::Home,
        ContentDomain::About,
        ContentDomain::Contact,
        ContentDomain::Seo,
        ContentDomain::WebDevelopment,
        ContentDomain::SocialMedia,
        ContentDomain::PaidAds,
        ContentDomain::Branding,
        ContentDomain::Portfolio,
        ContentDomain::CaseStudies,
        ContentDomain::Testimonials,
        ContentDomain::Team,
        ContentDomain::Pricing,
        ContentDomain::Faq,
        ContentDomain::Blog,
    ];

    /// Registry entry for this domain.
    pub const fn spec(self) -> DomainSpec {
        use ContentDomain::*;
        let (id, file, doc_type, natural_key) = match self {
            Navbar => ("navbar", "navbar.json", "navbar", NaturalKey::Singleton("navbar")),
            Footer => ("footer", "footer.json", "footer", NaturalKey::Singleton("footer")),
            Home => ("home", "home.json", "homePage", NaturalKey::Singleton("homePage")),
            About => ("about", "about.json", "aboutPage", NaturalKey::Singleton("aboutPage")),
            Contact => (
                "contact",
                "contact.json",
                "contactPage",
                NaturalKey::Singleton("contactPage"),
            ),
            Seo => ("seo", "seo-services.json", "seoService", NaturalKey::Slug),
            WebDevelopment => (
                "web-development",
                "web-development.json",
                "webDevelopmentService",
                NaturalKey::Slug,
            ),
            SocialMedia => (
                "social-media",
                "social-media.json",
                "socialMediaService",
                NaturalKey::Slug,
            ),
            PaidAds => ("paid-ads", "paid-ads.json", "paidAdsService", NaturalKey::Slug),
            Branding => ("branding", "branding.json", "brandingService", NaturalKey::Slug),
            Portfolio => ("portfolio", "portfolio.json", "portfolio", NaturalKey::Slug),
            CaseStudies => ("case-studies", "case-studies.json", "caseStudy", NaturalKey::Title),
            Testimonials => ("testimonials", "testimonials.json", "testimonial", NaturalKey::Slug),
            Team => ("team", "team.json", "teamMember", NaturalKey::Slug),
            Pricing => ("pricing", "pricing.json", "pricingPlan", NaturalKey::Title),
            Faq => ("faq", "faqs.json", "faqCategory", NaturalKey::Title),
            Blog => ("blog", "blog-posts.json", "blogPost", NaturalKey::Slug),
        };
        DomainSpec {
            domain: self,
            id,
            file,
            doc_type,
            natural_key,
        }
    }

    pub fn id(self) -> &'static str {
        self.spec().id
    }

    /// Look a domain up by its command-line identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.id() == id)
    }
}

impl std::fmt::Display for ContentDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for ContentDomain {
    type Err = SeedError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_id(s.trim()).ok_or_else(|| {
            let known: Vec<_> = Self::ALL.iter().map(|d| d.id()).collect();
            SeedError::validation(format!(
                "unknown content domain '{s}'. Known: {}",
                known.join(", ")
            ))
        })
    }
}

/// Parse a comma-separated domain filter, keeping registry order and
/// dropping duplicates.
pub fn parse_domain_filter(list: &str) -> Result<Vec<ContentDomain>, SeedError> {
    let mut wanted = Vec::new();
    for part in list.split(',').filter(|p| !p.trim().is_empty()) {
        wanted.push(part.parse::<ContentDomain>()?);
    }
    if wanted.is_empty() {
        return Err(SeedError::validation(
            "no content domain given; pass a comma-separated list of domain ids",
        ));
    }
    Ok(ContentDomain::ALL
        .into_iter()
        .filter(|d| wanted.contains(d))
        .collect())
}

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

static NON_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

/// Generate a URL-safe slug from a title.
pub fn slugify(title: &str) -> String {
    NON_SLUG_RE
        .replace_all(&title.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}
