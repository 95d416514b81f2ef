//! Property tests for synthetic identifier assignment

mod common;

use common::{EchoRenderer, PassthroughEngine};
use geoservices_core::models::{Dataset, QueryParams};
use geoservices_query::Geoservices;
use proptest::prelude::*;
use serde_json::json;

fn unnumbered(names: &[String]) -> Dataset {
    common::dataset(json!({
        "features": names
            .iter()
            .map(|name| common::point(0.0, 0.0, json!({ "name": name })))
            .collect::<Vec<_>>()
    }))
}

proptest! {
    #[test]
    fn ids_match_sequence_positions(names in prop::collection::vec("[a-z]{1,8}", 0..40)) {
        let geoservices = Geoservices::new(PassthroughEngine::default(), EchoRenderer);
        let params = QueryParams { return_ids_only: true, ..Default::default() };

        let response = geoservices.query(unnumbered(&names), params).unwrap().to_json().unwrap();

        let expected: Vec<usize> = (0..names.len()).collect();
        prop_assert_eq!(&response["objectIds"], &json!(expected));
    }

    #[test]
    fn count_matches_feature_total(names in prop::collection::vec("[a-z]{1,8}", 0..40)) {
        let geoservices = Geoservices::new(PassthroughEngine::default(), EchoRenderer);
        let params = QueryParams { return_count_only: true, ..Default::default() };

        let response = geoservices.query(unnumbered(&names), params).unwrap().to_json().unwrap();

        prop_assert_eq!(response, json!({ "count": names.len() }));
    }
}
