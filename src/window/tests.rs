//! Tests for window module

use super::*;

// ============================================================================
// HarvestWindow Tests
// ============================================================================

#[test]
fn test_window_bounds() {
    let window = HarvestWindow::new(2021, 3).unwrap();
    assert_eq!(window.start_bound(), "2021-03-01T00:00:00");
    assert_eq!(window.end_bound(), "2021-03-31T23:59:59");
    assert_eq!(window.to_string(), "2021-03");
}

#[test]
fn test_window_leap_february() {
    assert_eq!(HarvestWindow::new(2020, 2).unwrap().days_in_month(), 29);
    assert_eq!(HarvestWindow::new(2023, 2).unwrap().days_in_month(), 28);
    assert_eq!(
        HarvestWindow::new(2000, 2).unwrap().end_bound(),
        "2000-02-29T23:59:59"
    );
}

#[test]
fn test_window_december_end() {
    let window = HarvestWindow::new(1999, 12).unwrap();
    assert_eq!(window.end_bound(), "1999-12-31T23:59:59");
    assert_eq!(window.next(), HarvestWindow::new(2000, 1).unwrap());
}

#[test]
fn test_window_invalid_month() {
    assert!(HarvestWindow::new(2020, 0).is_err());
    assert!(HarvestWindow::new(2020, 13).is_err());
}

// ============================================================================
// WindowRouter Tests
// ============================================================================

#[test]
fn test_router_single_year() {
    let router = WindowRouter::new(2020, 2020).unwrap();
    let windows: Vec<_> = router.windows().collect();

    assert_eq!(windows.len(), 12);
    assert_eq!(router.len(), 12);
    assert_eq!(windows[0], HarvestWindow::new(2020, 1).unwrap());
    assert_eq!(windows[11], HarvestWindow::new(2020, 12).unwrap());
}

#[test]
fn test_router_is_chronological() {
    let router = WindowRouter::new(2019, 2021).unwrap();
    let windows: Vec<_> = router.windows().collect();

    assert_eq!(windows.len(), 36);
    assert!(windows.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(windows.windows(2).all(|pair| pair[0].next() == pair[1]));
}

#[test]
fn test_router_rejects_inverted_range() {
    let err = WindowRouter::new(2022, 2021).unwrap_err();
    assert!(err.to_string().contains("after end year"));
}

#[test]
fn test_validate_year() {
    assert_eq!(validate_year(1988, 2024).unwrap(), 1988);
    assert_eq!(validate_year(2024, 2024).unwrap(), 2024);
    assert!(validate_year(1987, 2024).is_err());
    assert!(validate_year(2025, 2024).is_err());
}
