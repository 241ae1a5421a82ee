//! Output format rule table.

/// Requirement clauses registered for one output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatRule {
    /// Lower-case format label, e.g. `geojson`.
    pub label: &'static str,
    /// Requirement clauses contributed by the format.
    pub clauses: &'static [&'static str],
}

/// Looks up a format by label, ignoring case.
#[must_use]
pub fn lookup(label: &str) -> Option<&'static FormatRule> {
    let label = label.to_lowercase();
    FORMATS.iter().find(|rule| rule.label == label)
}

/// The clauses contributed by a format label.
///
/// Unregistered labels contribute a single generic clause naming the
/// lower-cased label.
#[must_use]
pub fn clauses_for(label: &str) -> Vec<String> {
    lookup(label).map_or_else(
        || vec![fallback_clause(label)],
        |rule| rule.clauses.iter().map(ToString::to_string).collect(),
    )
}

/// The generic clause used for unregistered labels.
#[must_use]
pub fn fallback_clause(label: &str) -> String {
    format!("A format with the label {} SHALL be supported", label.to_lowercase())
}

static FORMATS: &[FormatRule] = &[
    FormatRule {
        label: "geojson",
        clauses: &[
            "A format with the label json SHALL provide GeoJSON output",
            "The GeoJSON output SHALL include standard GeoJSON properties: type, features, geometry, properties, and id",
            "The GeoJSON output SHALL include pagination metadata: numberMatched, numberReturned, and links array",
        ],
    },
    FormatRule {
        label: "coveragejson",
        clauses: &[
            "A format with the label covjson SHALL provide CoverageJSON output conforming to the CoverageJSON specification",
        ],
    },
    FormatRule {
        label: "csv",
        clauses: &["A format with the label csv SHALL provide CSV output with appropriate headers"],
    },
    FormatRule {
        label: "netcdf",
        clauses: &[
            "A format with the label netcdf SHALL provide NetCDF output conforming to CF conventions",
        ],
    },
    FormatRule {
        label: "grib",
        clauses: &[
            "A format with the label grib SHALL provide GRIB2 output conforming to WMO GRIB2 specification",
        ],
    },
    FormatRule {
        label: "grib2",
        clauses: &[
            "A format with the label grib SHALL provide GRIB2 output conforming to WMO GRIB2 specification",
        ],
    },
    FormatRule {
        label: "zarr",
        clauses: &["A format with the label zarr SHALL provide Zarr output conforming to Zarr specification"],
    },
];

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("GeoJSON", 3; "mixed case")]
    #[test_case("geojson", 3; "lower case")]
    #[test_case("CoverageJSON", 1; "coverage")]
    #[test_case("GRIB2", 1; "grib2")]
    #[test_case("Zarr", 1; "zarr")]
    fn registered_formats(label: &str, clauses: usize) {
        assert_eq!(clauses_for(label).len(), clauses);
        assert!(lookup(label).is_some());
    }

    #[test]
    fn unregistered_format_falls_back() {
        assert_eq!(
            clauses_for("XML"),
            vec!["A format with the label xml SHALL be supported".to_string()]
        );
    }
}
