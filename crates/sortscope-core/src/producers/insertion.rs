use crate::steps::Step;

/// Insertion sort with the key highlighted while it is being placed.
///
/// After each shift a second compare against the new left neighbour is
/// emitted when one exists, so comparison counts are higher than a textbook
/// insertion sort. A final pass marks every index sorted.
pub fn insertion(values: &[i64]) -> Vec<Step> {
    let mut arr = values.to_vec();
    let n = arr.len();
    let mut steps = Vec::new();

    for i in 1..n {
        let key = arr[i];
        // `hole` is the slot the key will land in
        let mut hole = i;
        steps.push(Step::highlight(i));
        while hole > 0 && arr[hole - 1] > key {
            steps.push(Step::compare(i, hole - 1));
            steps.push(Step::overwrite(hole, arr[hole - 1]));
            arr[hole] = arr[hole - 1];
            hole -= 1;
            if hole > 0 {
                steps.push(Step::compare(i, hole - 1));
            }
        }
        steps.push(Step::overwrite(hole, key));
        arr[hole] = key;
        steps.push(Step::clear_highlight(i));
        steps.push(Step::sorted(i));
    }

    steps.extend((0..n).map(Step::sorted));
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::{replay, StepSummary};

    #[test]
    fn test_single_shift() {
        let steps = insertion(&[2, 1]);
        assert_eq!(
            steps,
            vec![
                Step::highlight(1),
                Step::compare(1, 0),
                Step::overwrite(1, 2),
                Step::overwrite(0, 1),
                Step::clear_highlight(1),
                Step::sorted(1),
                Step::sorted(0),
                Step::sorted(1),
            ]
        );
    }

    #[test]
    fn test_extra_compare_after_shift() {
        // key 1 shifts past 3 then 2: compare, shift, re-compare, compare, shift
        let steps = insertion(&[2, 3, 1]);
        assert_eq!(replay(&[2, 3, 1], &steps), vec![1, 2, 3]);
        // i=1: no shift, no compare. i=2: 2 shifts, 2 loop compares + 1 in-bounds re-compare
        assert_eq!(StepSummary::of(&steps).compares, 3);
    }

    #[test]
    fn test_sorted_input_has_no_compares() {
        let steps = insertion(&[1, 2, 3, 4]);
        let summary = StepSummary::of(&steps);
        assert_eq!(summary.compares, 0);
        assert_eq!(summary.overwrites, 3);
        assert_eq!(summary.sorted_marks, 3 + 4);
    }

    #[test]
    fn test_empty() {
        assert!(insertion(&[]).is_empty());
        assert_eq!(insertion(&[5]), vec![Step::sorted(0)]);
    }
}
