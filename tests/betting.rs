use holdem_rs::cards::parse_cards;
use holdem_rs::deck::Deck;
use holdem_rs::game::{
    Action, ActionError, Game, HandHistoryVerb, HandStartError, LegalActions, Player, PlayerStatus,
    Street,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn mk_game(n: usize) -> Game {
    Game::new(n, 1000, 5, 10)
}

fn started(n: usize, seed: u64) -> Game {
    let mut g = mk_game(n);
    g.start_hand(&mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
    g
}

#[test]
fn preflop_legal_actions_for_first_to_act() {
    let g = started(3, 1);
    assert_eq!((g.dealer(), g.sb_pos(), g.bb_pos()), (0, Some(1), Some(2)));
    assert_eq!(g.to_act(), Some(0));
    let legal = g.legal_actions();
    assert!(legal.fold);
    assert!(!legal.check);
    assert_eq!(legal.call, Some(10));
    assert_eq!(legal.bet, None);
    assert_eq!(legal.raise, Some(20..=1000));
    assert_eq!(g.pot().total, 15);
}

#[test]
fn illegal_actions_leave_state_untouched() {
    let mut g = started(3, 2);
    let before = g.round_state();
    assert_eq!(g.apply(Action::Check), Err(ActionError::CannotCheck { to_call: 10 }));
    assert_eq!(g.apply(Action::Bet(20)), Err(ActionError::BetNotAllowed));
    assert_eq!(g.apply(Action::Raise(19)), Err(ActionError::AmountTooSmall { min: 20, got: 19 }));
    assert_eq!(
        g.apply(Action::Raise(5000)),
        Err(ActionError::AmountTooLarge { max: 1000, got: 5000 })
    );
    assert_eq!(g.round_state(), before);
    assert!(g.players()[0].last_action().is_none());
}

#[test]
fn no_actions_between_hands() {
    let mut g = mk_game(2);
    assert_eq!(g.legal_actions(), LegalActions::default());
    assert_eq!(g.apply(Action::Fold), Err(ActionError::HandNotInProgress));
}

#[test]
fn big_blind_gets_an_option() {
    let mut g = started(3, 3);
    g.apply(Action::Call).unwrap();
    g.apply(Action::Call).unwrap();
    assert_eq!(g.street(), Street::PreFlop, "big blind still to act");
    assert_eq!(g.to_act(), Some(2));
    let legal = g.legal_actions();
    assert!(legal.check);
    assert_eq!(legal.raise, Some(20..=1000));
    g.apply(Action::Check).unwrap();
    assert_eq!(g.street(), Street::Flop);
    assert_eq!(g.board().len(), 3);
    assert_eq!(g.to_act(), Some(1), "first live seat left of the dealer acts first");
    assert_eq!(g.pot().total, 30);
}

#[test]
fn raise_reopens_action_and_sets_min_raise() {
    let mut g = started(3, 4);
    g.apply(Action::Raise(30)).unwrap();
    assert_eq!(g.pot().current_bet, 30);
    assert_eq!(g.pot().min_raise, 20);
    assert_eq!(g.legal_actions().raise, Some(50..=1000));
    g.apply(Action::Call).unwrap();
    g.apply(Action::Raise(70)).unwrap();
    // The opener must respond to the re-raise.
    assert_eq!(g.to_act(), Some(0));
    assert_eq!(g.street(), Street::PreFlop);
    assert_eq!(g.legal_actions().call, Some(40));
}

#[test]
fn postflop_bet_bounds() {
    let mut g = started(3, 5);
    for _ in 0..3 {
        let legal = g.legal_actions();
        g.apply(if legal.check { Action::Check } else { Action::Call }).unwrap();
    }
    assert_eq!(g.street(), Street::Flop);
    let legal = g.legal_actions();
    assert_eq!(legal.bet, Some(10..=990));
    assert_eq!(g.apply(Action::Bet(9)), Err(ActionError::AmountTooSmall { min: 10, got: 9 }));
    g.apply(Action::Bet(10)).unwrap();
    assert!(g.legal_actions().raise.is_some());
}

#[test]
fn heads_up_dealer_posts_small_blind_and_acts_first() {
    let mut g = started(2, 6);
    assert_eq!(g.sb_pos(), Some(g.dealer()));
    assert_eq!(g.to_act(), Some(g.dealer()));
    g.apply(Action::Call).unwrap();
    g.apply(Action::Check).unwrap();
    assert_eq!(g.street(), Street::Flop);
    assert_eq!(g.bb_pos(), g.to_act(), "non-dealer acts first after the flop");
}

#[test]
fn everyone_folds_to_the_big_blind() {
    let mut g = started(3, 7);
    g.apply(Action::Fold).unwrap();
    g.apply(Action::Fold).unwrap();
    assert_eq!(g.street(), Street::HandComplete);
    assert_eq!(g.winners(), &[2]);
    assert_eq!(g.payouts(), &[0, 0, 15]);
    assert_eq!(g.players()[2].stack(), 1005);
    assert!(g.showdown_categories().iter().all(Option::is_none));
    assert_eq!(g.board().len(), 0);
}

#[test]
fn dealer_button_rotates_and_skips_busted_seats() {
    let players = vec![Player::new("A", 1000), Player::new("B", 0), Player::new("C", 1000)];
    let mut g = Game::with_players(players, 5, 10);
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    g.start_hand(&mut rng).unwrap();
    assert_eq!(g.dealer(), 0);
    assert!(matches!(g.players()[1].status(), PlayerStatus::Folded));
    assert!(g.players()[1].hole().is_none());
    while g.in_progress() {
        g.apply(Action::Fold).unwrap();
    }
    g.start_hand(&mut rng).unwrap();
    assert_eq!(g.dealer(), 2, "seat 1 has no chips");
    assert_eq!(g.hand_number(), 2);
}

#[test]
fn cannot_start_with_one_funded_player() {
    let players = vec![Player::new("A", 1000), Player::new("B", 0)];
    let mut g = Game::with_players(players, 5, 10);
    let err = g.start_hand(&mut ChaCha8Rng::seed_from_u64(9)).unwrap_err();
    assert_eq!(err, HandStartError::NotEnoughPlayers(1));
}

#[test]
fn cannot_start_mid_hand() {
    let mut g = started(3, 10);
    let err = g.start_hand(&mut ChaCha8Rng::seed_from_u64(10)).unwrap_err();
    assert_eq!(err, HandStartError::HandInProgress);
}

#[test]
fn short_blind_goes_all_in() {
    let players = vec![Player::new("A", 1000), Player::new("B", 3), Player::new("C", 1000)];
    let mut g = Game::with_players(players, 5, 10);
    g.start_hand(&mut ChaCha8Rng::seed_from_u64(11)).unwrap();
    assert!(matches!(g.players()[1].status(), PlayerStatus::AllIn));
    assert_eq!(g.pot().total, 13);
    assert_eq!(g.to_call(0), 10);
}

#[test]
fn short_stack_raises_all_in_without_reopening() {
    let players = vec![Player::new("A", 1000), Player::new("B", 15), Player::new("C", 1000)];
    let mut g = Game::with_players(players, 5, 10);
    g.start_hand(&mut ChaCha8Rng::seed_from_u64(12)).unwrap();
    let total = g.total_chips();
    g.apply(Action::Call).unwrap(); // A

    // B has 10 behind the small blind: short of a full raise to 20, but may shove to 15.
    assert_eq!(g.to_act(), Some(1));
    assert_eq!(g.legal_actions().raise, Some(15..=15));
    g.apply(Action::Raise(15)).unwrap();
    assert!(matches!(g.players()[1].status(), PlayerStatus::AllIn));
    assert_eq!((g.pot().current_bet, g.pot().min_raise), (15, 10));

    // C has not acted yet and keeps full raising rights.
    assert_eq!(g.legal_actions().raise, Some(25..=1000));
    g.apply(Action::Call).unwrap();

    // A already acted; the short all-in only lets them call or fold.
    assert_eq!(g.to_act(), Some(0));
    let legal = g.legal_actions();
    assert_eq!((legal.call, legal.raise), (Some(5), None));
    assert_eq!(g.apply(Action::Raise(25)), Err(ActionError::RaiseNotAllowed));
    g.apply(Action::Call).unwrap();

    assert_eq!(g.street(), Street::Flop);
    assert_eq!(g.pot().total, 45);
    assert_eq!(g.total_chips(), total);
}

#[test]
fn short_stack_bets_all_in_below_the_big_blind() {
    let players = vec![Player::new("A", 18), Player::new("B", 1000), Player::new("C", 1000)];
    let mut g = Game::with_players(players, 5, 10);
    g.start_hand(&mut ChaCha8Rng::seed_from_u64(13)).unwrap();
    let total = g.total_chips();
    g.apply(Action::Call).unwrap(); // A, 8 behind
    g.apply(Action::Call).unwrap(); // B
    g.apply(Action::Check).unwrap(); // C
    assert_eq!(g.street(), Street::Flop);

    g.apply(Action::Check).unwrap(); // B
    g.apply(Action::Check).unwrap(); // C
    assert_eq!(g.to_act(), Some(0));
    assert_eq!(g.legal_actions().bet, Some(8..=8));
    assert_eq!(g.apply(Action::Bet(9)), Err(ActionError::AmountTooLarge { max: 8, got: 9 }));
    g.apply(Action::Bet(8)).unwrap();
    assert!(matches!(g.players()[0].status(), PlayerStatus::AllIn));
    assert_eq!(g.pot().min_raise, 10);

    // Both checked already, so the short bet can be called but not raised.
    for seat in [1, 2] {
        assert_eq!(g.to_act(), Some(seat));
        let legal = g.legal_actions();
        assert_eq!((legal.check, legal.call, legal.raise), (false, Some(8), None));
        g.apply(Action::Call).unwrap();
    }
    assert_eq!(g.street(), Street::Turn);
    assert_eq!(g.pot().total, 54);
    assert_eq!(g.total_chips(), total);
}

#[test]
fn history_records_blinds_and_actions() {
    let top = parse_cards("Ah Ad Kh Kd Qh Qd").unwrap();
    let mut g = mk_game(3);
    g.start_hand_with_deck(Deck::stacked(&top).unwrap()).unwrap();
    g.apply(Action::Raise(25)).unwrap();
    g.apply(Action::Fold).unwrap();
    let verbs: Vec<HandHistoryVerb> = g.history().iter().map(|e| e.verb).collect();
    assert_eq!(
        verbs,
        vec![HandHistoryVerb::SmallBlind, HandHistoryVerb::BigBlind, HandHistoryVerb::RaiseTo, HandHistoryVerb::Fold]
    );
    assert_eq!(g.history()[2].amount, Some(25));
    assert_eq!(g.players()[0].last_action(), Some("Raise to 25"));
    assert_eq!(g.history_recent_offset(2, 0).len(), 2);
    assert_eq!(g.history_recent_offset(2, 0)[1].verb, HandHistoryVerb::Fold);
    assert_eq!(g.history_recent_offset(2, 2)[0].verb, HandHistoryVerb::SmallBlind);
}

/// Map two random numbers onto one of the currently legal actions.
fn pick(legal: &LegalActions, kind: u8, frac: u16) -> Action {
    let sized = |r: &std::ops::RangeInclusive<u64>| {
        let span = r.end() - r.start();
        r.start() + span * u64::from(frac) / u64::from(u16::MAX)
    };
    match kind % 8 {
        0 => Action::Fold,
        1 | 2 => match (&legal.bet, &legal.raise) {
            (Some(r), _) => Action::Bet(sized(r)),
            (None, Some(r)) => Action::Raise(sized(r)),
            _ if legal.check => Action::Check,
            _ => Action::Call,
        },
        _ if legal.check => Action::Check,
        _ => Action::Call,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_play_conserves_chips_and_closes_rounds(
        seed in any::<u64>(),
        seats in 2usize..=6,
        moves in prop::collection::vec((any::<u8>(), any::<u16>()), 1..200),
    ) {
        let mut g = Game::new(seats, 500, 5, 10);
        let total = g.total_chips();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for (kind, frac) in moves {
            if !g.in_progress() && g.start_hand(&mut rng).is_err() {
                break;
            }
            if !g.in_progress() {
                continue;
            }
            let legal = g.legal_actions();
            let action = pick(&legal, kind, frac);
            prop_assert!(legal.permits(action), "{:?} not in {:?}", action, legal);

            let street = g.street();
            let actor = g.to_act();
            let current_bet = g.pot().current_bet;
            let waiting: Vec<(usize, u64)> = g
                .players()
                .iter()
                .enumerate()
                .filter(|(s, p)| Some(*s) != actor && matches!(p.status(), PlayerStatus::Active))
                .map(|(s, p)| (s, p.bet()))
                .collect();

            g.apply(action).unwrap();
            prop_assert_eq!(g.total_chips(), total);

            if g.street() != street {
                // Nobody still able to act was left short of the bet.
                for (seat, bet) in waiting {
                    let still_active = matches!(g.players()[seat].status(), PlayerStatus::Active);
                    if still_active && !matches!(action, Action::Bet(_) | Action::Raise(_)) {
                        prop_assert_eq!(bet, current_bet, "seat {} unmatched on {}", seat, street);
                    }
                }
            }
            if !g.in_progress() {
                prop_assert_eq!(g.pot().total, 0);
                let paid: u64 = g.payouts().iter().sum();
                prop_assert!(paid > 0);
                prop_assert!(!g.winners().is_empty());
            }
        }
        let stacks: u64 = g.players().iter().map(Player::stack).sum();
        if !g.in_progress() {
            prop_assert_eq!(stacks, total);
        }
    }
}
