use crate::steps::Step;

/// Selection sort. The swap into position `i` is emitted even when the
/// minimum is already there.
pub fn selection(values: &[i64]) -> Vec<Step> {
    let mut arr = values.to_vec();
    let n = arr.len();
    let mut steps = Vec::new();

    for i in 0..n.saturating_sub(1) {
        let mut min_idx = i;
        for j in i + 1..n {
            steps.push(Step::compare(min_idx, j));
            if arr[j] < arr[min_idx] {
                min_idx = j;
            }
        }
        steps.push(Step::swap(i, min_idx));
        arr.swap(i, min_idx);
        steps.push(Step::sorted(i));
    }
    if n > 0 {
        steps.push(Step::sorted(n - 1));
    }

    steps
}
