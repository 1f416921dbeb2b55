use era_content::{Choice, Era, KnowledgeTransmission, Question, Recipe};
use proptest::prelude::*;
use rabbit_hole::{
    evaluate, plausibility_floor, required_threshold, BranchingEngine, CoherenceScoring,
    NullObserver, Player, Presentation, QuestionGraph, QuestionNode, Selection, SessionConfig,
    PLAUSIBILITY_FLOOR_CAP,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn idea(text: &str, environmental: f64, cultural: f64) -> Choice {
    Choice::new(KnowledgeTransmission::new(text, environmental, cultural))
}

fn mill_era() -> Era {
    let mill = Choice::new(
        KnowledgeTransmission::new("Water mill", 0.9, 0.8)
            .with_recipes(vec![Recipe::new(["gear", "wheel"])]),
    );
    let gear = Choice::new(
        KnowledgeTransmission::new("Cast a bronze gear", 0.85, 0.7)
            .with_recipes(vec![Recipe::new(["mould"])]),
    );

    Era::new("Medieval", 1200)
        .with_question(
            Question::new("How do you grind grain faster?")
                .with_choice(mill)
                .with_choice(idea("Hire more millers", 0.6, 1.0))
                .with_choice(idea("Pray for strong arms", 0.05, 1.0)),
        )
        .with_topic(
            "gear",
            Question::new("How would you make a gear?")
                .with_choice(gear)
                .with_choice(idea("Carve it from cheese", 0.0, 0.2)),
        )
        .with_topic(
            "wheel",
            Question::new("How would you make a wheel?")
                .with_choice(idea("Bend oak planks", 0.9, 0.9))
                .with_choice(idea("Use a millstone", 0.5, 0.5)),
        )
        .with_topic(
            "mould",
            Question::new("How would you make a mould?")
                .with_choice(idea("Pack wet sand", 0.95, 0.9))
                .with_choice(idea("Freeze water", 0.3, 0.4)),
        )
}

/// Picks uniformly among the presented options.
struct RandomPlayer {
    rng: StdRng,
}

impl Player for RandomPlayer {
    fn select<N, C>(&mut self, presentation: &Presentation<N, C>) -> Selection {
        let index = self.rng.gen_range(0..presentation.options.len());
        Selection::Chosen(presentation.options[index].option_ref)
    }
}

proptest! {
    #[test]
    fn property_threshold_is_non_decreasing(
        floor in 0.0_f64..=1.0,
        ramp in 0.0_f64..0.5,
        depth in 0_u32..64,
    ) {
        let config = SessionConfig {
            base_coherence_floor: floor,
            coherence_ramp: ramp,
            ..Default::default()
        };
        let here = required_threshold(depth, &config);
        let deeper = required_threshold(depth + 1, &config);

        prop_assert!(deeper >= here);
        prop_assert!(here <= 1.0);
    }

    #[test]
    fn property_plausibility_floor_is_capped_and_non_decreasing(depth in 0_u32..1_000) {
        let here = plausibility_floor(depth);
        prop_assert!(here <= PLAUSIBILITY_FLOOR_CAP);
        prop_assert!(plausibility_floor(depth + 1) >= here);
    }

    #[test]
    fn property_evaluate_is_idempotent_and_bounded(
        environmental in 0.0_f64..=1.0,
        cultural in 0.0_f64..=1.0,
        include_cultural in any::<bool>(),
    ) {
        let choice = idea("anything", environmental, cultural);
        let config = SessionConfig {
            include_cultural_coherence: include_cultural,
            ..Default::default()
        };

        let first = evaluate(&choice, &config);
        prop_assert_eq!(first, evaluate(&choice, &config));
        prop_assert!((0.0..=1.0).contains(&first));
    }

    #[test]
    fn property_presentation_is_a_permutation(seed in any::<u64>()) {
        let engine = BranchingEngine::new(
            QuestionGraph::new(mill_era()),
            CoherenceScoring,
            SessionConfig::default(),
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(seed);

        let presentation = engine.present_node(&QuestionNode::Core(0), 0, &mut rng).unwrap();
        let mut shown: Vec<&str> = presentation.labels();
        shown.sort();

        let mut authored: Vec<String> = mill_era().questions[0]
            .choices
            .iter()
            .map(|c| c.text().to_string())
            .collect();
        authored.sort();

        prop_assert_eq!(shown, authored.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn property_depth_tracks_deepest_correct_answer(seed in any::<u64>(), cores in 1_usize..6) {
        let config = SessionConfig {
            num_core_questions: cores,
            ..Default::default()
        };
        let engine =
            BranchingEngine::new(QuestionGraph::new(mill_era()), CoherenceScoring, config).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut player = RandomPlayer { rng: StdRng::seed_from_u64(seed.wrapping_add(1)) };

        let finished = engine.play(&mut player, &mut NullObserver, &mut rng).unwrap();
        let answered = finished.state.answered();

        let deepest = answered
            .iter()
            .filter(|a| a.is_correct)
            .map(|a| a.depth + 1)
            .max()
            .unwrap_or(0);
        prop_assert_eq!(finished.summary.depth, deepest);
        prop_assert_eq!(answered.iter().filter(|a| a.core).count(), cores);

        // A follow-up is only ever asked one level below the answer that opened it.
        for pair in answered.windows(2) {
            prop_assert!(pair[1].depth <= pair[0].depth + 1);
        }
    }
}
