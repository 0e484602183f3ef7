//! Accept-Language content negotiation.

/// A single `Accept-Language` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageRange {
    /// Lower-cased language tag (`en-us`) or `*`
    pub tag: String,

    /// Weight between 0 and 1
    pub quality: f32,
}

impl LanguageRange {
    fn primary(&self) -> &str {
        self.tag.split('-').next().unwrap_or(&self.tag)
    }
}

/// Parse an `Accept-Language` header value.
///
/// Entries keep the order in which the client listed them. Entries with an
/// unparseable or non-finite weight (`nan`, `inf`) are ignored; weights are
/// clamped to `[0, 1]`.
pub fn parse_accept_language(header: &str) -> Vec<LanguageRange> {
    header
        .split(',')
        .filter_map(|raw| {
            let mut parts = raw.split(';');
            let tag = parts.next()?.trim().to_lowercase();
            if tag.is_empty() {
                return None;
            }

            let mut quality = 1.0_f32;
            for param in parts {
                let param = param.trim();
                if let Some(value) = param.strip_prefix("q=").or_else(|| param.strip_prefix("Q=")) {
                    let value = value.trim().parse::<f32>().ok().filter(|q| q.is_finite())?;
                    quality = value.clamp(0.0, 1.0);
                }
            }

            Some(LanguageRange { tag, quality })
        })
        .collect()
}

/// Pick the client's best-weighted language among `available`.
///
/// A code matches a range exactly, or through its primary subtag (`en-US`
/// accepts `en`), or through `*`. Exact matches take precedence over primary
/// subtag matches, which take precedence over the wildcard. Among codes with
/// the same weight the one the client listed first wins, then the order of
/// `available`. Returns `None` if nothing acceptable intersects.
pub fn preferred_language<'a>(header: &str, available: &[&'a str]) -> Option<&'a str> {
    let ranges = parse_accept_language(header);
    if ranges.is_empty() {
        return None;
    }

    let mut best: Option<(&'a str, f32, usize)> = None;
    for &code in available {
        let Some((quality, position)) = quality_for(&ranges, code) else {
            continue;
        };
        if quality <= 0.0 {
            continue;
        }
        let better = match best {
            None => true,
            Some((_, best_quality, best_position)) => {
                quality > best_quality || (quality == best_quality && position < best_position)
            }
        };
        if better {
            best = Some((code, quality, position));
        }
    }

    best.map(|(code, _, _)| code)
}

/// Weight a client gives to `code`, with the position of the range that
/// decided it.
fn quality_for(ranges: &[LanguageRange], code: &str) -> Option<(f32, usize)> {
    let code = code.to_lowercase();
    let code_primary = code.split('-').next().unwrap_or(&code).to_string();

    let exact = ranges.iter().position(|range| range.tag == code);
    if let Some(position) = exact {
        return Some((ranges[position].quality, position));
    }

    let by_primary = ranges
        .iter()
        .enumerate()
        .filter(|(_, range)| range.tag != "*" && range.primary() == code_primary)
        .fold(None, |acc: Option<(f32, usize)>, (position, range)| match acc {
            Some((quality, _)) if quality >= range.quality => acc,
            _ => Some((range.quality, position)),
        });
    if by_primary.is_some() {
        return by_primary;
    }

    ranges
        .iter()
        .position(|range| range.tag == "*")
        .map(|position| (ranges[position].quality, position))
}
