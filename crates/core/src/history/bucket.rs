use super::frequency::Frequency;
use super::history_model::PricePoint;

/// Reduces a price series to one point per bucket, newest bucket first.
///
/// Each bucket is represented by its earliest raw sample, restamped with the
/// bucket start. `Raw` keeps every point and only reorders.
pub fn bucketize(mut points: Vec<PricePoint>, frequency: Frequency) -> Vec<PricePoint> {
    // Stable ordering: timestamp, then insertion id for identical timestamps.
    points.sort_by(|a, b| {
        a.recorded_at
            .cmp(&b.recorded_at)
            .then_with(|| a.id.cmp(&b.id))
    });

    if frequency == Frequency::Raw {
        points.reverse();
        return points;
    }

    let mut buckets: Vec<PricePoint> = Vec::new();
    for mut point in points {
        let start = frequency.truncate(point.recorded_at);
        if buckets.last().is_some_and(|b| b.recorded_at == start) {
            continue;
        }
        point.recorded_at = start;
        buckets.push(point);
    }
    buckets.reverse();
    buckets
}
