use semver::{BuildMetadata, Prerelease, Version};

/// How many numeric components a parsed version actually spelled out.
///
/// `7.4` parses to `7.4.0` with [`Precision::Minor`], which lets constraint
/// matching treat the missing patch as a wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precision {
    Major,
    Minor,
    Patch,
}

/// Parse a version string into a semver::Version, normalizing partial versions.
///
/// Lifecycle data is not strict semver, so parsing is lenient:
/// - optional `v`/`V` prefix
/// - one to three numeric components, missing ones padded with zero
/// - leading zeros allowed ("22.04" -> 22.4.0)
/// - optional `-prerelease` and `+build` suffixes
///
/// Examples:
/// - "1" -> Version(1, 0, 0)
/// - "7.4" -> Version(7, 4, 0)
/// - "v4.0.30319" -> Version(4, 0, 30319)
pub fn parse_version(version: &str) -> Option<Version> {
    parse_partial(version).map(|(version, _)| version)
}

/// Like [`parse_version`], but also reports how many components were present.
pub fn parse_partial(version: &str) -> Option<(Version, Precision)> {
    let version = version.trim();
    let version = version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version);

    let (rest, build) = match version.split_once('+') {
        Some((rest, build)) => (rest, BuildMetadata::new(build).ok()?),
        None => (version, BuildMetadata::EMPTY),
    };
    let (core, pre) = match rest.split_once('-') {
        Some((core, pre)) => (core, Prerelease::new(pre).ok()?),
        None => (rest, Prerelease::EMPTY),
    };

    let parts = core
        .split('.')
        .map(parse_component)
        .collect::<Option<Vec<u64>>>()?;

    let (major, minor, patch, precision) = match parts.as_slice() {
        [major] => (*major, 0, 0, Precision::Major),
        [major, minor] => (*major, *minor, 0, Precision::Minor),
        [major, minor, patch] => (*major, *minor, *patch, Precision::Patch),
        _ => return None,
    };

    Some((
        Version {
            major,
            minor,
            patch,
            pre,
            build,
        },
        precision,
    ))
}

fn parse_component(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Some(Version::new(1, 0, 0)))]
    #[case("7.4", Some(Version::new(7, 4, 0)))]
    #[case("7.4.33", Some(Version::new(7, 4, 33)))]
    #[case("v1.2.3", Some(Version::new(1, 2, 3)))]
    #[case("22.04", Some(Version::new(22, 4, 0)))]
    #[case("4.0.30319", Some(Version::new(4, 0, 30319)))]
    #[case(" 18 ", Some(Version::new(18, 0, 0)))]
    #[case("1.2.3.4", None)]
    #[case("3.5 SP1", None)]
    #[case("invalid", None)]
    #[case("", None)]
    #[case("1..2", None)]
    fn parse_version_returns_expected(#[case] input: &str, #[case] expected: Option<Version>) {
        assert_eq!(parse_version(input), expected);
    }

    #[test]
    fn parse_version_keeps_prerelease_and_build() {
        let version = parse_version("2.0.0-rc.1+build.5").unwrap();

        assert_eq!(version.pre.as_str(), "rc.1");
        assert_eq!(version.build.as_str(), "build.5");
    }

    #[rstest]
    #[case("18", Precision::Major)]
    #[case("1.20", Precision::Minor)]
    #[case("1.20.3", Precision::Patch)]
    fn parse_partial_reports_precision(#[case] input: &str, #[case] expected: Precision) {
        let (_, precision) = parse_partial(input).unwrap();
        assert_eq!(precision, expected);
    }
}
