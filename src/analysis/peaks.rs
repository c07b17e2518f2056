// Released under MIT License.
// Copyright (c) 2025 lamman_rs developers

//! Implementation of peak finding in one-dimensional data.

/// Find indices of local maxima in `data`.
///
/// A local maximum is a sample (or a flat plateau of samples) strictly larger than
/// both of its neighbors. For plateaus, the middle index is reported (rounded down).
/// The first and the last sample are never peaks.
///
/// - Peaks lower than `min_height` are discarded.
/// - If `min_distance` is provided, peaks are visited from the highest to the lowest and
///   every lower peak closer than `min_distance` samples to an already kept peak is removed.
///
/// Returned indices are sorted in ascending order.
///
/// ## Example
/// ```
/// # use lamman_rs::analysis::peaks::find_peaks;
/// #
/// let data = [0.0, 2.0, 0.0, 1.5, 0.0, 0.5, 0.0];
/// assert_eq!(find_peaks(&data, None, None), vec![1, 3, 5]);
/// assert_eq!(find_peaks(&data, Some(1.0), None), vec![1, 3]);
/// assert_eq!(find_peaks(&data, None, Some(3)), vec![1, 5]);
/// ```
pub fn find_peaks(data: &[f64], min_height: Option<f64>, min_distance: Option<usize>) -> Vec<usize> {
    let mut peaks = local_maxima(data);

    if let Some(height) = min_height {
        peaks.retain(|&p| data[p] >= height);
    }

    match min_distance {
        Some(distance) if distance > 1 => select_by_distance(&peaks, data, distance),
        _ => peaks,
    }
}

/// Find local maxima including flat plateaus.
fn local_maxima(data: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if data.len() < 3 {
        return peaks;
    }

    let last = data.len() - 1;
    let mut i = 1;
    while i < last {
        if data[i - 1] < data[i] {
            let mut ahead = i + 1;
            while ahead < last && data[ahead] == data[i] {
                ahead += 1;
            }

            if data[ahead] < data[i] {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }

    peaks
}

/// Remove peaks closer than `distance` to a higher peak.
fn select_by_distance(peaks: &[usize], data: &[f64], distance: usize) -> Vec<usize> {
    let mut keep = vec![true; peaks.len()];

    let mut order: Vec<usize> = (0..peaks.len()).collect();
    order.sort_by(|&a, &b| data[peaks[a]].total_cmp(&data[peaks[b]]));

    for &j in order.iter().rev() {
        if !keep[j] {
            continue;
        }

        for k in (0..j).rev() {
            if peaks[j] - peaks[k] >= distance {
                break;
            }
            keep[k] = false;
        }

        for k in (j + 1)..peaks.len() {
            if peaks[k] - peaks[j] >= distance {
                break;
            }
            keep[k] = false;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, k)| k.then_some(p))
        .collect()
}
