use super::domain::CanonicalListing;

const UNKNOWN_SLUG: &str = "property-unknown";

/// Lowercase, ASCII-folded, hyphen-separated form of `value`.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_hyphen = false;

    for ch in value.chars().flat_map(char::to_lowercase) {
        let folded = match ch {
            'ä' | 'å' | 'á' | 'à' | 'â' => 'a',
            'ö' | 'ø' | 'ó' | 'ò' | 'ô' => 'o',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'ü' | 'ú' | 'ù' | 'û' => 'u',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'š' => 's',
            'ž' => 'z',
            other => other,
        };

        if folded.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(folded);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Slug fallback chain: address, provider id, running number, literal.
/// Never returns an empty string.
pub fn derive_slug(address: &str, provider_id: &str, running_number: Option<&str>) -> String {
    let from_address = slugify(address);
    if !from_address.is_empty() {
        return from_address;
    }

    [Some(provider_id), running_number]
        .into_iter()
        .flatten()
        .map(slugify)
        .find(|candidate| !candidate.is_empty())
        .map(|candidate| format!("property-{candidate}"))
        .unwrap_or_else(|| UNKNOWN_SLUG.to_string())
}

/// Recompute a listing's slug from its own fields.
pub fn slug_for(listing: &CanonicalListing) -> String {
    derive_slug(
        &listing.location.slug_source(),
        listing.id.as_str(),
        listing.identifier.as_deref(),
    )
}
