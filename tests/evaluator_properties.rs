use holdem_rs::cards::{Card, Rank, Suit};
use holdem_rs::evaluator::{evaluate, evaluate_five, evaluate_seven, Category};
use proptest::prelude::*;
use std::cmp::Ordering;

/// `n` distinct cards in random order.
fn distinct_cards(n: usize) -> impl Strategy<Value = Vec<Card>> {
    let all: Vec<u8> = (0..52).collect();
    prop::sample::subsequence(all, n)
        .prop_shuffle()
        .prop_map(|idx| idx.into_iter().filter_map(Card::from_index).collect())
}

fn rank_from_val(v: u8) -> Rank {
    Rank::from_value(v).unwrap_or(Rank::Ace)
}

fn straight_cards(top: u8) -> [Card; 5] {
    let ranks = if top == 5 {
        [Rank::Ace, Rank::Two, Rank::Three, Rank::Four, Rank::Five]
    } else {
        [
            rank_from_val(top - 4),
            rank_from_val(top - 3),
            rank_from_val(top - 2),
            rank_from_val(top - 1),
            rank_from_val(top),
        ]
    };
    let suits = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades, Suit::Clubs];
    [
        Card::new(ranks[0], suits[0]),
        Card::new(ranks[1], suits[1]),
        Card::new(ranks[2], suits[2]),
        Card::new(ranks[3], suits[3]),
        Card::new(ranks[4], suits[4]),
    ]
}

fn flush_rank_set() -> impl Strategy<Value = Vec<Rank>> {
    prop::collection::btree_set(2u8..=14u8, 5)
        .prop_filter("non-straight ranks", |set| {
            let vals: Vec<u8> = set.iter().copied().collect();
            let is_wheel = vals == vec![2, 3, 4, 5, 14];
            let is_straight = vals.windows(2).all(|w| w[1] == w[0] + 1);
            !(is_straight || is_wheel)
        })
        .prop_map(|set| set.into_iter().rev().map(rank_from_val).collect())
}

proptest! {
    #[test]
    fn result_ignores_card_order(cards in distinct_cards(7)) {
        let forward = evaluate(&cards).unwrap();
        let mut reversed = cards.clone();
        reversed.reverse();
        let backward = evaluate(&reversed).unwrap();
        prop_assert_eq!(forward.category, backward.category);
        prop_assert_eq!(forward.cmp(&backward), Ordering::Equal);
        prop_assert_eq!(forward.tiebreak(), backward.tiebreak());
    }

    #[test]
    fn ordering_is_total_and_transitive(a in distinct_cards(5), b in distinct_cards(5), c in distinct_cards(5)) {
        let ea = evaluate(&a).unwrap();
        let eb = evaluate(&b).unwrap();
        let ec = evaluate(&c).unwrap();

        prop_assert_eq!(ea.cmp(&eb), eb.cmp(&ea).reverse());
        if ea >= eb && eb >= ec { prop_assert!(ea >= ec); }
        // A higher category always wins regardless of ranks.
        if ea.category > eb.category { prop_assert!(ea > eb); }
    }

    #[test]
    fn seven_card_best_is_at_least_as_good_as_any_five(cards in distinct_cards(7)) {
        let seven = [cards[0], cards[1], cards[2], cards[3], cards[4], cards[5], cards[6]];
        let best7 = evaluate_seven(&seven);
        for i in 0..3 { for j in (i+1)..4 { for k in (j+1)..5 { for l in (k+1)..6 { for m in (l+1)..7 {
            let five = [cards[i], cards[j], cards[k], cards[l], cards[m]];
            prop_assert!(best7 >= evaluate_five(&five));
        }}}}}
    }

    #[test]
    fn straight_ordering_respects_top_card(top_hi in 6u8..=14u8, top_lo in 5u8..=13u8) {
        prop_assume!(top_hi > top_lo);
        let e_hi = evaluate_five(&straight_cards(top_hi));
        let e_lo = evaluate_five(&straight_cards(top_lo));
        prop_assert_eq!(e_hi.category, Category::Straight);
        prop_assert_eq!(e_lo.category, Category::Straight);
        prop_assert!(e_hi > e_lo);
    }

    #[test]
    fn wheel_is_lowest_straight(top in 6u8..=14u8) {
        let e_wheel = evaluate_five(&straight_cards(5));
        let e_high = evaluate_five(&straight_cards(top));
        prop_assert_eq!(e_wheel.category, Category::Straight);
        prop_assert!(e_high > e_wheel);
    }

    #[test]
    fn flush_kickers_compare_high_to_low(a in flush_rank_set(), b in flush_rank_set()) {
        let suit = Suit::Hearts;
        let hand = |r: &[Rank]| [
            Card::new(r[0], suit),
            Card::new(r[1], suit),
            Card::new(r[2], suit),
            Card::new(r[3], suit),
            Card::new(r[4], suit),
        ];
        let e_a = evaluate_five(&hand(&a));
        let e_b = evaluate_five(&hand(&b));
        prop_assert_eq!(e_a.category, Category::Flush);
        prop_assert_eq!(e_b.category, Category::Flush);
        // Ranks arrive high to low, so slice comparison is the kicker order.
        prop_assert_eq!(e_a.cmp(&e_b), a.as_slice().cmp(b.as_slice()));
    }
}

#[test]
fn wheel_loses_to_six_high_straight() {
    assert!(evaluate_five(&straight_cards(6)) > evaluate_five(&straight_cards(5)));
}
