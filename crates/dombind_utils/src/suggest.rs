/// Picks the candidate closest to `target` by edit distance, ignoring ASCII case.
///
/// Short names tolerate a single edit, longer ones up to a third of their length
/// (capped at three), so `Geolocaton` suggests `Geolocation` but `Foo` never
/// suggests `Node`.
pub fn find_best_match<'a, I>(target: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = target.to_ascii_lowercase();
    let threshold = (needle.chars().count() / 3).clamp(1, 3);

    let mut best: Option<(usize, &str)> = None;
    for candidate in candidates {
        let distance = levenshtein_distance(&needle, &candidate.to_ascii_lowercase());
        if distance > threshold {
            continue;
        }
        match best {
            Some((current, _)) if current <= distance => {}
            _ => best = Some((distance, candidate)),
        }
    }

    best.map(|(_, name)| name.to_string())
}

fn levenshtein_distance(left: &str, right: &str) -> usize {
    let right: Vec<char> = right.chars().collect();
    let mut previous: Vec<usize> = (0..=right.len()).collect();
    let mut current = vec![0; right.len() + 1];

    for (i, lc) in left.chars().enumerate() {
        current[0] = i + 1;
        for (j, rc) in right.iter().enumerate() {
            let cost = usize::from(lc != *rc);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[right.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_close_interface_names() {
        let names = ["Geolocation", "GeolocationPosition", "Storage"];
        assert_eq!(
            find_best_match("Geolocaton", names).as_deref(),
            Some("Geolocation")
        );
        assert_eq!(find_best_match("storage", names).as_deref(), Some("Storage"));
        assert_eq!(find_best_match("Clipboard", names), None);
    }

    #[test]
    fn distance_counts_edits() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("same", "same"), 0);
    }
}
