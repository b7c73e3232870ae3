//! Per-endpoint schema descriptors.
//!
//! One descriptor per response shape the frontend consumes, defined once
//! here and never derived from data. Handlers pick the descriptor matching
//! their endpoint and hand it to `pipeline::recover` together with the raw
//! model text.

use crate::normalize::{ArrayPolicy, FieldSpec, SchemaDescriptor, Shape};

/// The match list always carries exactly this many records.
pub const MATCH_COUNT: usize = 6;

/// Upper bound on "explore more" suggestions shown to the user.
pub const EXPLORE_LIMIT: usize = 10;

fn string_list() -> FieldSpec {
    FieldSpec::array(ArrayPolicy {
        element: Some(Box::new(FieldSpec::string(""))),
        ..ArrayPolicy::default()
    })
}

/// Assessment overview shown right after questionnaire submission.
pub fn overview() -> SchemaDescriptor {
    SchemaDescriptor::object(
        Shape::new()
            .field("summary", FieldSpec::string("No summary available."))
            .field("strengths", string_list())
            .field("growth_areas", string_list())
            .field("work_style", FieldSpec::string("Unknown"))
            .field("confidence", FieldSpec::number_clamped(75.0, 0.0, 100.0)),
    )
}

fn match_record() -> Shape {
    Shape::new()
        .field("title", FieldSpec::string("Unknown"))
        .field("description", FieldSpec::string(""))
        .field("match_score", FieldSpec::number_clamped(50.0, 0.0, 100.0))
        .field("salary_range", FieldSpec::string("Not available"))
        .field("education_path", FieldSpec::string("Not available"))
        .field("skills", string_list())
}

/// Career-match list: exactly `MATCH_COUNT` records, padded with defaults
/// when the model returns fewer. A bare object is accepted as a
/// single-match list — models sometimes collapse the requested array.
pub fn matches() -> SchemaDescriptor {
    SchemaDescriptor::array(ArrayPolicy {
        element: Some(Box::new(FieldSpec::object(match_record()))),
        pad_to: Some(MATCH_COUNT),
        wrap_single_object: true,
        ..ArrayPolicy::default()
    })
}

/// "Explore more careers" list: up to `EXPLORE_LIMIT` suggestions, no
/// padding — an empty list renders fine.
pub fn explore() -> SchemaDescriptor {
    SchemaDescriptor::array(ArrayPolicy {
        element: Some(Box::new(FieldSpec::object(
            Shape::new()
                .field("career", FieldSpec::string("Unknown"))
                .field("reason", FieldSpec::string(""))
                .field("first_step", FieldSpec::string("")),
        ))),
        max_len: Some(EXPLORE_LIMIT),
        wrap_single_object: true,
        ..ArrayPolicy::default()
    })
}

/// Full career profile for the results page.
pub fn profile() -> SchemaDescriptor {
    SchemaDescriptor::object(
        Shape::new()
            .field("headline", FieldSpec::string("Career profile"))
            .field("summary", FieldSpec::string("No summary available."))
            .field(
                "traits",
                FieldSpec::array(ArrayPolicy {
                    element: Some(Box::new(FieldSpec::object(
                        Shape::new()
                            .field("name", FieldSpec::string("Unknown"))
                            .field("score", FieldSpec::number_clamped(50.0, 0.0, 100.0)),
                    ))),
                    ..ArrayPolicy::default()
                }),
            )
            .field("recommended_paths", string_list()),
    )
}

/// Side-by-side career comparison. Fewer than two entries is not a
/// comparison, so short lists fall back to the empty default and the
/// single-object leniency stays off.
pub fn comparison() -> SchemaDescriptor {
    SchemaDescriptor::object(
        Shape::new()
            .field(
                "careers",
                FieldSpec::array(ArrayPolicy {
                    element: Some(Box::new(FieldSpec::object(
                        Shape::new()
                            .field("title", FieldSpec::string("Unknown"))
                            .field("pros", string_list())
                            .field("cons", string_list())
                            .field("salary_range", FieldSpec::string("Not available"))
                            .field("outlook", FieldSpec::string("")),
                    ))),
                    min_len: Some(2),
                    max_len: Some(4),
                    ..ArrayPolicy::default()
                }),
            )
            .field("verdict", FieldSpec::string("")),
    )
}
