/// Lower-cases, transliterates Turkish letters and joins words with `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        let mapped = match c {
            'ç' => 'c',
            'ğ' => 'g',
            'ı' | 'i' | 'î' => 'i',
            'ö' => 'o',
            'ş' => 's',
            'ü' | 'û' => 'u',
            'â' => 'a',
            '\u{307}' => continue,
            c if c.is_ascii_alphanumeric() => c,
            _ => {
                pending_dash = !slug.is_empty();
                continue;
            }
        };
        if pending_dash {
            slug.push('-');
            pending_dash = false;
        }
        slug.push(mapped);
    }

    slug
}

pub fn validate_slug(slug: &str) -> Result<(), String> {
    if slug.is_empty() {
        return Err("slug must not be empty".to_string());
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(format!("slug {} may only contain a-z, 0-9 and -", slug));
    }
    Ok(())
}

/// Uses the given slug when present, otherwise derives one from `title`.
pub fn resolve_slug(slug: Option<&str>, title: &str) -> Result<String, String> {
    let slug = match slug.map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => slug.to_string(),
        None => slugify(title),
    };
    validate_slug(&slug)?;
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_become_slugs() {
        assert_eq!(slugify("Kış Kampanyası 2026!"), "kis-kampanyasi-2026");
        assert_eq!(slugify("  Altın  &  Gümüş  "), "altin-gumus");
        assert_eq!(slugify("Çeyrek / Yarım"), "ceyrek-yarim");
    }

    #[test]
    fn explicit_slug_wins_but_must_be_valid() {
        assert_eq!(resolve_slug(Some("ozel-gun"), "Ignored"), Ok("ozel-gun".to_string()));
        assert_eq!(resolve_slug(Some("  "), "Yeni Yıl"), Ok("yeni-yil".to_string()));
        assert!(resolve_slug(Some("Bad Slug"), "x").is_err());
        assert!(resolve_slug(None, "!!!").is_err());
    }
}
