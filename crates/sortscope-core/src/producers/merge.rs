use crate::steps::Step;

/// Top-down merge sort over two buffers whose source/destination roles
/// alternate at each level of recursion.
///
/// Every merged range is marked sorted once its merge finishes. Enclosing
/// merges can overwrite those indices again, so the tag is only final after
/// the outermost merge.
pub fn merge(values: &[i64]) -> Vec<Step> {
    let mut steps = Vec::new();
    if values.len() <= 1 {
        return steps;
    }

    let mut main = values.to_vec();
    let mut aux = main.clone();
    let end = main.len() - 1;
    sort_range(&mut main, &mut aux, 0, end, &mut steps);
    steps
}

/// Sort `main[start..=end]`, reading the two halves back out of `aux`.
fn sort_range(main: &mut [i64], aux: &mut [i64], start: usize, end: usize, steps: &mut Vec<Step>) {
    if start == end {
        return;
    }
    let middle = (start + end) / 2;
    sort_range(aux, main, start, middle, steps);
    sort_range(aux, main, middle + 1, end, steps);
    merge_runs(main, aux, start, middle, end, steps);
}

fn merge_runs(
    main: &mut [i64],
    aux: &[i64],
    start: usize,
    middle: usize,
    end: usize,
    steps: &mut Vec<Step>,
) {
    let mut k = start;
    let mut i = start;
    let mut j = middle + 1;

    while i <= middle && j <= end {
        steps.push(Step::compare(i, j));
        if aux[i] <= aux[j] {
            steps.push(Step::overwrite(k, aux[i]));
            main[k] = aux[i];
            i += 1;
        } else {
            steps.push(Step::overwrite(k, aux[j]));
            main[k] = aux[j];
            j += 1;
        }
        k += 1;
    }

    // Leftovers still get a (self) compare so every placement takes two ticks.
    while i <= middle {
        steps.push(Step::compare(i, i));
        steps.push(Step::overwrite(k, aux[i]));
        main[k] = aux[i];
        i += 1;
        k += 1;
    }
    while j <= end {
        steps.push(Step::compare(j, j));
        steps.push(Step::overwrite(k, aux[j]));
        main[k] = aux[j];
        j += 1;
        k += 1;
    }

    steps.extend((start..=end).map(Step::sorted));
}
