//! Exact min-cost one-to-one assignment (Jonker-Volgenant shortest
//! augmenting path, O(n²m)). Solves the rectangular problem directly;
//! when rows outnumber columns the transpose is solved instead, so the
//! smaller side is always fully assigned.

/// Solve the min-cost assignment over a dense `rows × cols` cost
/// matrix, `cost(i, j) >= 0`. Returns, per row, the assigned column —
/// `None` for rows left over when `rows > cols`.
pub fn min_cost_assignment(
    rows: usize,
    cols: usize,
    cost: impl Fn(usize, usize) -> f64,
) -> Vec<Option<usize>> {
    if rows == 0 || cols == 0 {
        return vec![None; rows];
    }

    if rows > cols {
        // Transpose: assign every column a row, then invert.
        let col_to_row = lapjv(cols, rows, |j, i| cost(i, j));
        let mut assignment = vec![None; rows];
        for (j, row) in col_to_row.into_iter().enumerate() {
            if let Some(i) = row {
                assignment[i] = Some(j);
            }
        }
        return assignment;
    }

    lapjv(rows, cols, cost)
}

/// Core solver, requires `n <= m`. One augmenting path per row; dual
/// potentials keep reduced costs non-negative throughout.
fn lapjv(n: usize, m: usize, cost: impl Fn(usize, usize) -> f64) -> Vec<Option<usize>> {
    // 1-indexed internals; index 0 is the virtual start column/row.
    let mut u = vec![0.0f64; n + 1];
    let mut v = vec![0.0f64; m + 1];
    let mut owner = vec![0usize; m + 1]; // owner[j] = row holding column j
    let mut way = vec![0usize; m + 1];

    for i in 1..=n {
        owner[0] = i;
        let mut j0 = 0usize;
        let mut min_to = vec![f64::INFINITY; m + 1];
        let mut used = vec![false; m + 1];

        loop {
            used[j0] = true;
            let i0 = owner[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0usize;

            for j in 1..=m {
                if used[j] {
                    continue;
                }
                let reduced = cost(i0 - 1, j - 1) - u[i0] - v[j];
                if reduced < min_to[j] {
                    min_to[j] = reduced;
                    way[j] = j0;
                }
                if min_to[j] < delta {
                    delta = min_to[j];
                    j1 = j;
                }
            }

            for j in 0..=m {
                if used[j] {
                    u[owner[j]] += delta;
                    v[j] -= delta;
                } else {
                    min_to[j] -= delta;
                }
            }

            j0 = j1;
            if owner[j0] == 0 {
                break;
            }
        }

        // Walk the augmenting path backwards, flipping assignments.
        loop {
            let j1 = way[j0];
            owner[j0] = owner[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut assignment = vec![None; n];
    for j in 1..=m {
        if owner[j] != 0 {
            assignment[owner[j] - 1] = Some(j - 1);
        }
    }
    assignment
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(costs: &[&[f64]]) -> Vec<Option<usize>> {
        let rows = costs.len();
        let cols = if rows == 0 { 0 } else { costs[0].len() };
        min_cost_assignment(rows, cols, |i, j| costs[i][j])
    }

    fn total(costs: &[&[f64]], assignment: &[Option<usize>]) -> f64 {
        assignment
            .iter()
            .enumerate()
            .filter_map(|(i, j)| j.map(|j| costs[i][j]))
            .sum()
    }

    /// Exhaustive optimum for small square/rectangular instances.
    fn brute_force(costs: &[&[f64]]) -> f64 {
        fn go(costs: &[&[f64]], row: usize, used: &mut Vec<bool>) -> f64 {
            if row == costs.len() {
                return 0.0;
            }
            let mut best = f64::INFINITY;
            for j in 0..costs[0].len() {
                if !used[j] {
                    used[j] = true;
                    let c = costs[row][j] + go(costs, row + 1, used);
                    if c < best {
                        best = c;
                    }
                    used[j] = false;
                }
            }
            best
        }
        go(costs, 0, &mut vec![false; costs[0].len()])
    }

    #[test]
    fn square_known_optimum() {
        let costs: &[&[f64]] = &[
            &[4.0, 1.0, 3.0],
            &[2.0, 0.0, 5.0],
            &[3.0, 2.0, 2.0],
        ];
        let assignment = solve(costs);
        assert_eq!(assignment, vec![Some(1), Some(0), Some(2)]);
        assert_eq!(total(costs, &assignment), 5.0);
    }

    #[test]
    fn diagonal_preferred() {
        let costs: &[&[f64]] = &[
            &[0.0, 10.0],
            &[10.0, 0.0],
        ];
        assert_eq!(solve(costs), vec![Some(0), Some(1)]);
    }

    #[test]
    fn greedy_is_suboptimal_here() {
        // Row 0's cheapest column is 0, but taking it forces row 1 into
        // cost 100. The optimal solution crosses over.
        let costs: &[&[f64]] = &[
            &[1.0, 2.0],
            &[1.0, 100.0],
        ];
        let assignment = solve(costs);
        assert_eq!(assignment, vec![Some(1), Some(0)]);
        assert_eq!(total(costs, &assignment), 3.0);
    }

    #[test]
    fn wide_matrix_assigns_every_row() {
        let costs: &[&[f64]] = &[
            &[8.0, 1.0, 6.0, 4.0],
            &[5.0, 9.0, 2.0, 7.0],
        ];
        let assignment = solve(costs);
        assert_eq!(assignment, vec![Some(1), Some(2)]);
    }

    #[test]
    fn tall_matrix_leaves_rows_unassigned() {
        let costs: &[&[f64]] = &[
            &[1.0],
            &[0.5],
            &[2.0],
        ];
        let assignment = solve(costs);
        // Only the cheapest row wins the single column.
        assert_eq!(assignment, vec![None, Some(0), None]);
    }

    #[test]
    fn one_to_one_even_with_uniform_costs() {
        let costs: &[&[f64]] = &[
            &[1.0, 1.0, 1.0],
            &[1.0, 1.0, 1.0],
            &[1.0, 1.0, 1.0],
        ];
        let assignment = solve(costs);
        let mut cols: Vec<usize> = assignment.iter().map(|c| c.unwrap()).collect();
        cols.sort_unstable();
        assert_eq!(cols, vec![0, 1, 2]);
    }

    #[test]
    fn matches_brute_force_on_small_instances() {
        let cases: Vec<Vec<Vec<f64>>> = vec![
            vec![
                vec![7.0, 5.0, 11.0],
                vec![5.0, 4.0, 1.0],
                vec![9.0, 3.0, 2.0],
            ],
            vec![
                vec![1.0, 2.0, 3.0, 4.0],
                vec![2.0, 4.0, 6.0, 8.0],
                vec![3.0, 6.0, 9.0, 12.0],
                vec![4.0, 8.0, 12.0, 16.0],
            ],
            vec![
                vec![100.0, 0.0, 100.0, 50.0],
                vec![0.0, 100.0, 100.0, 50.0],
                vec![50.0, 50.0, 0.0, 100.0],
            ],
        ];
        for case in &cases {
            let refs: Vec<&[f64]> = case.iter().map(|r| r.as_slice()).collect();
            let assignment = min_cost_assignment(refs.len(), refs[0].len(), |i, j| refs[i][j]);
            assert!(
                (total(&refs, &assignment) - brute_force(&refs)).abs() < 1e-9,
                "solver not optimal for {case:?}"
            );
        }
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(min_cost_assignment(0, 3, |_, _| 0.0), Vec::<Option<usize>>::new());
        assert_eq!(min_cost_assignment(2, 0, |_, _| 0.0), vec![None, None]);
    }
}
