//! Integration tests: flow record -> feature vector -> standardized vector

#[cfg(test)]
mod integration_tests {
    use crate::logic::dataset::TrainingDataset;
    use crate::logic::features::{FeatureStatistics, FlowRecord, FEATURE_LAYOUT};
    use ndarray::array;

    #[test]
    fn test_record_standardized_against_dataset() {
        let ds = TrainingDataset::from_matrix(array![
            [800.0, 1000.0, 80.0, 8.0],
            [1200.0, 1400.0, 120.0, 12.0],
        ])
        .unwrap();
        let stats = FeatureStatistics::fit(&ds).unwrap();

        let z = stats.transform(&FlowRecord::normal_example().features());
        assert!(z.is_finite());
        // the normal example sits exactly on the training means
        for name in FEATURE_LAYOUT {
            assert_eq!(z.get_by_name(name), Some(0.0), "{}", name);
        }

        let big = FlowRecord { source_bytes: 1_400, ..FlowRecord::normal_example() };
        let z = stats.transform(&big.features());
        assert!(z.get_by_name("BytesSent").unwrap() > 1.0);
    }

    #[test]
    fn test_display_only_fields_do_not_change_features() {
        let a = FlowRecord::normal_example();
        let b = FlowRecord {
            packets_received: 9_999,
            source_port: 1,
            destination_port: 2,
            protocol: crate::logic::features::Protocol::Icmp,
            ..a.clone()
        };
        assert_eq!(a.features(), b.features());
        assert_eq!(a.features().named().len(), FEATURE_LAYOUT.len());
    }
}
