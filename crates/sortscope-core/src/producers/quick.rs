use crate::steps::Step;

/// Quicksort with the Lomuto partition scheme (pivot is the last element).
///
/// No sorted marks are emitted; the final values are the only result.
pub fn quick(values: &[i64]) -> Vec<Step> {
    let mut arr = values.to_vec();
    let mut steps = Vec::new();
    if !arr.is_empty() {
        let high = arr.len() - 1;
        sort_range(&mut arr, 0, high, &mut steps);
    }
    steps
}

fn sort_range(arr: &mut [i64], low: usize, high: usize, steps: &mut Vec<Step>) {
    if low < high {
        let pivot_idx = partition(arr, low, high, steps);
        if pivot_idx > low {
            sort_range(arr, low, pivot_idx - 1, steps);
        }
        sort_range(arr, pivot_idx + 1, high, steps);
    }
}

/// Returns the pivot's final index.
fn partition(arr: &mut [i64], low: usize, high: usize, steps: &mut Vec<Step>) -> usize {
    let pivot = arr[high];
    steps.push(Step::highlight(high));

    // next slot for a value <= pivot
    let mut store = low;
    for j in low..high {
        steps.push(Step::compare(j, high));
        if arr[j] <= pivot {
            steps.push(Step::swap(store, j));
            arr.swap(store, j);
            store += 1;
        }
    }

    steps.push(Step::swap(store, high));
    arr.swap(store, high);
    steps.push(Step::clear_highlight(store));
    store
}
