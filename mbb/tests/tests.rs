#[cfg(test)]
mod tests {
    use opack::util::assertions::solution_is_valid;
    use opack::{BoxDims, Instance, PackConfig, RectDesc, probe};
    use test_case::test_case;

    fn instance(dims: &[(i32, i32, bool)]) -> Instance {
        let descs: Vec<_> = dims
            .iter()
            .map(|&(w, h, r)| RectDesc { width: w, height: h, rotatable: r })
            .collect();
        Instance::new(&descs).unwrap()
    }

    fn named_instance(name: &str) -> Instance {
        match name {
            "four_squares" => instance(&[(2, 2, false); 4]),
            "square_benchmark" => instance(&[
                (3, 3, false),
                (2, 2, false),
                (2, 2, false),
                (2, 2, false),
                (2, 2, false),
                (2, 2, false),
            ]),
            "mixed_small" => instance(&[(2, 2, false), (1, 2, false), (1, 1, false)]),
            "two_rotatable" => instance(&[(3, 2, true), (2, 3, true)]),
            "sequential_squares" => instance(&[(1, 1, false), (2, 2, false), (3, 3, false)]),
            "sequential_unoriented" => instance(&[(1, 2, true), (2, 3, true)]),
            other => panic!("unknown instance: {other}"),
        }
    }

    fn feasibility(inst: &Instance, w: i32, h: i32, config: &PackConfig) -> bool {
        let report = probe(inst, BoxDims::new(w, h).unwrap(), config);
        if let Some(solution) = &report.solution {
            assert!(solution_is_valid(solution, inst));
        }
        assert_eq!(report.feasible, report.solution.is_some());
        report.feasible
    }

    #[test]
    fn four_squares_tile_their_box() {
        let inst = named_instance("four_squares");
        let report = probe(&inst, BoxDims::new(4, 4).unwrap(), &PackConfig::default());
        assert!(report.feasible);
        let solution = report.solution.unwrap();
        assert!(solution_is_valid(&solution, &inst));
        // zero slack: the four placements tile the box exactly
        assert_eq!(inst.total_area, solution.box_dims.area());
    }

    #[test]
    fn square_benchmark_boxes() {
        let inst = named_instance("square_benchmark");
        let config = PackConfig::default();
        assert!(feasibility(&inst, 7, 7, &config));
        assert!(feasibility(&inst, 6, 6, &config));
        // five 2x2 and the 3x3 cannot share a 3-high strip: 13 > 10 columns
        assert!(!feasibility(&inst, 10, 3, &config));
        // short of area
        assert!(!feasibility(&inst, 7, 4, &config));
    }

    #[test]
    fn oversized_rectangle_is_rejected() {
        let inst = instance(&[(5, 3, false)]);
        assert!(!feasibility(&inst, 4, 4, &PackConfig::default()));
    }

    #[test]
    fn rotatable_rectangle_fits_its_transpose() {
        let inst = instance(&[(5, 3, true)]);
        let report = probe(&inst, BoxDims::new(3, 5).unwrap(), &PackConfig::default());
        assert!(report.feasible);
        let p = report.solution.unwrap().placements[0];
        assert!(p.rotated);
        assert_eq!((p.x, p.y), (0, 0));
    }

    #[test_case("four_squares", 4, 4; "four squares tight")]
    #[test_case("four_squares", 4, 5; "four squares slack")]
    #[test_case("four_squares", 2, 8; "four squares column")]
    #[test_case("square_benchmark", 6, 6; "benchmark tight")]
    #[test_case("square_benchmark", 10, 3; "benchmark strip")]
    #[test_case("mixed_small", 3, 3; "mixed fits")]
    #[test_case("mixed_small", 4, 2; "mixed strip")]
    #[test_case("two_rotatable", 4, 3; "rotatable pair tight")]
    #[test_case("two_rotatable", 3, 4; "rotatable pair transposed")]
    #[test_case("sequential_squares", 5, 3; "squares family fits")]
    #[test_case("sequential_squares", 4, 4; "squares family blocked")]
    #[test_case("sequential_unoriented", 2, 4; "unoriented family tight")]
    #[test_case("sequential_unoriented", 3, 3; "unoriented family square")]
    fn domination_agrees_with_plain_search(name: &str, w: i32, h: i32) {
        let inst = named_instance(name);
        let with = PackConfig::default();
        let without = PackConfig { use_domination: false, break_symmetry: false, ..with };
        assert_eq!(
            feasibility(&inst, w, h, &with),
            feasibility(&inst, w, h, &without),
        );
    }

    #[test]
    fn sequential_families_use_their_closed_form_tables() {
        // sanity of the family detection the oracle factory keys on
        assert!(named_instance("sequential_squares").is_sequential_squares());
        assert!(named_instance("sequential_unoriented").is_sequential_unoriented());
        assert!(!named_instance("four_squares").is_sequential_squares());
    }

    #[test]
    fn probe_reports_node_counters() {
        let inst = named_instance("square_benchmark");
        let report = probe(&inst, BoxDims::new(6, 6).unwrap(), &PackConfig::default());
        assert!(report.feasible);
        assert!(report.counters.total() > 0);
    }
}
