use chrono::{NaiveDate, TimeDelta};
use ndarray::array;
use tempest_array::{ArrayError, Coordinate, MaskedArray, NamedArray, ValidityMask};

fn init_times() -> Coordinate {
    let t0 = NaiveDate::from_ymd_opt(2020, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    Coordinate::Time(vec![t0, t0 + TimeDelta::hours(12)])
}

#[test]
fn forecast_shaped_arithmetic_keeps_coordinates() {
    let forecast = NamedArray::new(
        ["init_time", "lead_time"],
        array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]].into_dyn(),
    )
    .unwrap()
    .with_coord("init_time", init_times())
    .unwrap()
    .with_coord(
        "lead_time",
        Coordinate::Duration(vec![
            TimeDelta::hours(6),
            TimeDelta::hours(12),
            TimeDelta::hours(18),
        ]),
    )
    .unwrap();

    let offset = NamedArray::from_vec("init_time", vec![0.5, -0.5])
        .with_coord("init_time", init_times())
        .unwrap();

    let shifted = forecast.zip_with(&offset, |a, b| a + b).unwrap();
    assert_eq!(shifted.dims(), &["init_time", "lead_time"]);
    assert_eq!(shifted.get(&[0, 0]), Some(&1.5));
    assert_eq!(shifted.get(&[1, 2]), Some(&5.5));
    assert_eq!(shifted.coord("init_time"), Some(&init_times()));
    assert!(shifted.coord("lead_time").is_some());
}

#[test]
fn mismatched_labels_fail_fast() {
    let a = NamedArray::from_vec("init_time", vec![1.0, 2.0])
        .with_coord("init_time", init_times())
        .unwrap();
    let other_times = Coordinate::Time(vec![
        NaiveDate::from_ymd_opt(2021, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        2
    ]);
    let b = NamedArray::from_vec("init_time", vec![1.0, 2.0])
        .with_coord("init_time", other_times)
        .unwrap();
    assert!(matches!(
        a.zip_with(&b, |x, y| x * y),
        Err(ArrayError::CoordinateMismatch { dim }) if dim == "init_time"
    ));
}

#[test]
fn masked_array_json_round_trip() {
    let values = NamedArray::new(["lat", "lon"], array![[0.1, 0.2], [0.3, 0.4]].into_dyn())
        .unwrap()
        .with_coord("lat", Coordinate::Float(vec![-10.0, 10.0]))
        .unwrap();
    let mask = ValidityMask::new(NamedArray::from_vec("lat", vec![true, false]));
    let masked = MaskedArray::new(values).with_mask(mask).unwrap();

    let json = serde_json::to_string(&masked).unwrap();
    let back: MaskedArray = serde_json::from_str(&json).unwrap();
    assert_eq!(back.values().dims(), masked.values().dims());
    assert_eq!(back.mask(), masked.mask());
    assert_eq!(back.values().coord("lat"), masked.values().coord("lat"));
}
