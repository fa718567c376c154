// tests/sampling_tests.rs

use littlewood::math::polynomial::{add_to_digits, digits_of, total_polynomial_count};
use littlewood::sampling::{
    effective_count, next_index, RenderBudget, SamplingConfig, SamplingMode, SamplingPlan,
};

#[cfg(test)]
mod sampling_tests {
    use super::*;

    const ALL_MODES: [SamplingMode; 5] = [
        SamplingMode::Uniform,
        SamplingMode::FirstN,
        SamplingMode::PseudoRandom,
        SamplingMode::FilterConstantTerm,
        SamplingMode::FilterLeadingTerm,
    ];

    fn indices(plan: &SamplingPlan) -> Vec<f64> {
        (0..).map_while(|slot| plan.index_for(slot)).collect()
    }

    #[test]
    fn test_same_arguments_same_index() {
        for mode in ALL_MODES {
            let config = SamplingConfig::new(mode).with_filter(2).with_offset(0.37);
            let total = total_polynomial_count(12, 5);
            for slot in [0u64, 1, 2, 996, 997, 12345] {
                let budget = RenderBudget::Limited(12 * 50_000);
                let first = next_index(slot, 4471.0, &config, total, 5, 12, budget);
                let second = next_index(slot, 4471.0, &config, total, 5, 12, budget);
                assert_eq!(first, second, "mode {:?} slot {}", mode, slot);
            }
        }
    }

    #[test]
    fn test_uniform_strides_evenly() {
        // palette 2, degree 11: 4096 polynomials; 64 needed -> stride 64
        let config = SamplingConfig::new(SamplingMode::Uniform).with_offset(0.5);
        let plan = SamplingPlan::new(11, 2, config, RenderBudget::Limited(11 * 64));
        assert_eq!(plan.stride, 64.0);

        let visited = indices(&plan);
        assert_eq!(visited.len(), 64);
        assert_eq!(visited[0], 31.0);
        for pair in visited.windows(2) {
            assert_eq!(pair[1] - pair[0], 64.0);
        }
        assert!(*visited.last().unwrap() < plan.total_count);
    }

    #[test]
    fn test_uniform_full_offset_stays_in_space() {
        let config = SamplingConfig::new(SamplingMode::Uniform).with_offset(1.0);
        let plan = SamplingPlan::new(6, 3, config, RenderBudget::Limited(6 * 100));
        let visited = indices(&plan);
        assert_eq!(visited.len() as f64, plan.polynomials_needed);
        assert!(visited.iter().all(|&i| i < plan.total_count));
    }

    #[test]
    fn test_first_n_walks_contiguous_block() {
        // palette 3, degree 5: 729 polynomials, 100 needed
        let config = SamplingConfig::new(SamplingMode::FirstN).with_offset(0.5);
        let plan = SamplingPlan::new(5, 3, config, RenderBudget::Limited(5 * 100));
        let visited = indices(&plan);
        assert_eq!(visited.len(), 100);
        assert_eq!(visited[0], (0.5f64 * 629.0).floor());
        for pair in visited.windows(2) {
            assert_eq!(pair[1] - pair[0], 1.0);
        }
    }

    #[test]
    fn test_first_n_offset_one_ends_at_last_polynomial() {
        let config = SamplingConfig::new(SamplingMode::FirstN).with_offset(1.0);
        let plan = SamplingPlan::new(5, 3, config, RenderBudget::Limited(5 * 100));
        assert_eq!(indices(&plan).last().copied(), Some(728.0));
    }

    #[test]
    fn test_first_n_budget_equal_to_space() {
        // palette 2, degree 3: 16 polynomials, budget asks for exactly 16
        for offset in [0.0, 0.5, 1.0] {
            let config = SamplingConfig::new(SamplingMode::FirstN).with_offset(offset);
            let plan = SamplingPlan::new(3, 2, config, RenderBudget::Limited(3 * 16));
            assert_eq!(plan.polynomials_needed, 16.0);
            assert_eq!(indices(&plan), (0..16).map(|i| i as f64).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_budget_larger_than_space_is_capped() {
        let plan = SamplingPlan::new(3, 2, SamplingConfig::default(), RenderBudget::Limited(10_000));
        assert_eq!(plan.polynomials_needed, 16.0);
        assert_eq!(plan.stride, 1.0);
        assert_eq!(indices(&plan).len(), 16);
    }

    #[test]
    fn test_filter_constant_term_matches_target() {
        let palette_len = 3;
        let degree = 5;
        for target in 0..palette_len {
            let config = SamplingConfig::new(SamplingMode::FilterConstantTerm).with_filter(target);
            for budget in [5 * 10, 5 * 100, 5 * 729] {
                let plan = SamplingPlan::new(degree, palette_len, config, RenderBudget::Limited(budget));
                let visited = indices(&plan);
                assert!(!visited.is_empty());
                for index in &visited {
                    assert_eq!(*index % palette_len as f64, target as f64);
                    assert_eq!(digits_of(*index, degree, palette_len)[0], target);
                    assert!(*index < plan.total_count);
                }
            }
        }
    }

    #[test]
    fn test_filter_constant_term_with_full_budget_visits_whole_residue_class() {
        let config = SamplingConfig::new(SamplingMode::FilterConstantTerm).with_filter(1);
        let plan = SamplingPlan::new(5, 3, config, RenderBudget::Limited(5 * 729));
        assert_eq!(indices(&plan).len(), 243);
        assert_eq!(plan.effective_count, 243.0);
    }

    #[test]
    fn test_filter_leading_term_stays_in_block() {
        let palette_len = 3;
        let degree = 4;
        let block = 81.0;
        for target in 0..palette_len {
            let config = SamplingConfig::new(SamplingMode::FilterLeadingTerm).with_filter(target);
            for budget in [4 * 20, 4 * 100, 4 * 243] {
                let plan = SamplingPlan::new(degree, palette_len, config, RenderBudget::Limited(budget));
                let visited = indices(&plan);
                assert!(!visited.is_empty());
                for index in &visited {
                    assert!(*index >= target as f64 * block && *index < (target + 1) as f64 * block);
                    assert_eq!(digits_of(*index, degree, palette_len)[degree], target);
                }
            }
        }
    }

    #[test]
    fn test_filter_leading_term_block_exhaustion_boundary() {
        // stride 1: the block of 81 ends exactly at slot 81
        let config = SamplingConfig::new(SamplingMode::FilterLeadingTerm).with_filter(2);
        let total = 243.0;
        let budget = RenderBudget::Limited(4 * 243);
        assert_eq!(next_index(80, 1.0, &config, total, 3, 4, budget), Some(242.0));
        assert_eq!(next_index(81, 1.0, &config, total, 3, 4, budget), None);

        let plan = SamplingPlan::new(4, 3, config, budget);
        assert_eq!(indices(&plan).len(), 81);
        assert_eq!(effective_count(&config, total, 3, 4, budget), 81.0);
    }

    #[test]
    fn test_pseudo_random_stays_in_space() {
        let config = SamplingConfig::new(SamplingMode::PseudoRandom);
        let plan = SamplingPlan::new(10, 3, config, RenderBudget::Limited(10 * 5000));
        let visited = indices(&plan);
        assert_eq!(visited.len(), 5000);
        assert!(visited.iter().all(|&i| i >= 0.0 && i < plan.total_count && i.fract() == 0.0));
        // jittered, so not a plain stride
        assert!(visited.windows(2).any(|w| w[1] - w[0] != plan.stride));
    }

    #[test]
    fn test_huge_space_sampling() {
        // palette 30, degree 31: ~1.9e47 polynomials
        let config = SamplingConfig::new(SamplingMode::Uniform).with_offset(0.25);
        let plan = SamplingPlan::new(31, 30, config, RenderBudget::Limited(31 * 1000));
        assert_eq!(plan.polynomials_needed, 1000.0);
        let visited = indices(&plan);
        assert_eq!(visited.len(), 1000);
        assert!(visited.windows(2).all(|w| w[1] > w[0]));
        assert!(visited.iter().all(|&i| i < plan.total_count));
    }

    fn digit_walk(plan: &SamplingPlan) -> Vec<Vec<usize>> {
        let mut walk = Vec::new();
        let mut digits = Vec::new();
        let mut slot = 0;
        while plan.digits_for(slot, &mut digits) {
            walk.push(digits.clone());
            slot += 1;
        }
        walk
    }

    #[test]
    fn test_constant_term_filter_is_exact_past_f64_precision() {
        for (palette_len, degree) in [(2, 60), (30, 31)] {
            for target in [0, 1] {
                let config = SamplingConfig::new(SamplingMode::FilterConstantTerm).with_filter(target);
                let plan = SamplingPlan::new(degree, palette_len, config, RenderBudget::Limited(degree as u64 * 1000));
                let walk = digit_walk(&plan);
                assert!(walk.len() > 30, "palette {} degree {}: {} visited", palette_len, degree, walk.len());
                for digits in &walk {
                    assert_eq!(digits.len(), degree + 1);
                    assert_eq!(digits[0], target);
                    assert!(digits.iter().all(|&d| d < palette_len));
                }
                // successive slots differ above the pinned digit
                assert!(walk.windows(2).all(|w| w[0] != w[1]));
            }
        }
    }

    #[test]
    fn test_leading_term_filter_is_exact_past_f64_precision() {
        let config = SamplingConfig::new(SamplingMode::FilterLeadingTerm).with_filter(29);
        let plan = SamplingPlan::new(31, 30, config, RenderBudget::Limited(31 * 1000));
        let walk = digit_walk(&plan);
        assert!(!walk.is_empty());
        assert!(walk.iter().all(|digits| digits[31] == 29));
    }

    #[test]
    fn test_first_n_with_offset_walks_consecutive_block_in_huge_space() {
        for offset in [0.5, 1.0] {
            let config = SamplingConfig::new(SamplingMode::FirstN).with_offset(offset);
            let plan = SamplingPlan::new(31, 30, config, RenderBudget::Limited(31 * 1000));
            let walk = digit_walk(&plan);
            assert_eq!(walk.len(), 1000, "offset {}", offset);
            for pair in walk.windows(2) {
                let mut next = pair[0].clone();
                assert!(add_to_digits(&mut next, 30, 1));
                assert_eq!(next, pair[1]);
            }
        }
    }

    #[test]
    fn test_digits_agree_with_index_in_exact_range() {
        for mode in ALL_MODES {
            let config = SamplingConfig::new(mode).with_filter(1).with_offset(0.3);
            let plan = SamplingPlan::new(9, 3, config, RenderBudget::Limited(9 * 200));
            let walk = digit_walk(&plan);
            let visited = indices(&plan);
            assert_eq!(walk.len(), visited.len());
            for (digits, index) in walk.iter().zip(&visited) {
                assert_eq!(&digits_of(*index, 9, 3), digits);
            }
        }
    }
}
