use crate::steps::Step;

/// Adjacent compare-and-swap passes. Each pass settles the largest remaining
/// value at the end of the unsorted region.
pub fn bubble(values: &[i64]) -> Vec<Step> {
    let mut arr = values.to_vec();
    let n = arr.len();
    let mut steps = Vec::new();

    for i in 0..n.saturating_sub(1) {
        for j in 0..n - i - 1 {
            steps.push(Step::compare(j, j + 1));
            if arr[j] > arr[j + 1] {
                steps.push(Step::swap(j, j + 1));
                arr.swap(j, j + 1);
            }
        }
        steps.push(Step::sorted(n - 1 - i));
    }
    if n > 0 {
        steps.push(Step::sorted(0));
    }

    steps
}
