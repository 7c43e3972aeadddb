//! End-to-end scenarios: a group opens a prediction, friends join,
//! the outcome is confirmed, and losers are sent to their payment apps.

mod mock_opener;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;

use vyre::group::{Group, InviteCodeGenerator, Member};
use vyre::payments::{requests_for, LaunchOutcome, PaymentLauncher, PaymentRail};
use vyre::prediction::Prediction;
use vyre::router::{Event, Router, View};
use vyre::settlement::{aggregate, distribute};
use vyre::types::{PayoutHandles, PredictionStatus, SettlementError, Side, Stake};

use mock_opener::MockOpener;

fn stake(id: &str, name: &str, side: Side, amount: Decimal) -> Stake {
    Stake::new(id, name, side, amount)
        .unwrap()
        .with_handles(PayoutHandles {
            venmo: Some(format!("{id}-venmo")),
            cash_app: Some(format!("${id}")),
            zelle: Some(format!("{id}@example.com")),
        })
}

fn game_night() -> (Group, Prediction) {
    let group = Group::create(
        "Game night",
        Member::new("ana", "Ana"),
        &InviteCodeGenerator::default(),
    );
    let code = group.invite_code.clone();
    let group = group
        .join_with_code(&code, Member::new("ben", "Ben"))
        .unwrap()
        .join_with_code(&code, Member::new("cy", "Cy"))
        .unwrap();

    let prediction = Prediction::open(
        group.id.clone(),
        "Will the home team win?",
        "Home",
        "Away",
        stake("ana", "Ana", Side::A, dec!(30)),
    )
    .unwrap()
    .join(stake("ben", "Ben", Side::A, dec!(70)))
    .unwrap()
    .join(stake("cy", "Cy", Side::B, dec!(100)))
    .unwrap();

    (group, prediction)
}

#[test]
fn test_group_to_settlement_flow() {
    let (group, open) = game_night();
    assert_eq!(group.members.len(), 3);
    assert_eq!(open.group_id(), group.id);

    let odds = open.pool_stats();
    assert_eq!(odds.side_a_share, dec!(50.0));
    assert_eq!(odds.total_pool, dec!(200));

    let resolved = open.resolve(Side::A).unwrap();
    assert_eq!(resolved.status(), PredictionStatus::Resolved);
    assert_eq!(open.status(), PredictionStatus::Open);

    let s = resolved.settlement().unwrap();
    assert_eq!(s.winner("ana").unwrap().payout, dec!(60));
    assert_eq!(s.winner("ben").unwrap().profit, dec!(70));
    assert_eq!(s.loser("cy").unwrap().loss, dec!(100));
}

#[test]
fn test_settlement_snapshot_is_frozen() {
    let (_, open) = game_night();
    let resolved = open.resolve(Side::B).unwrap();
    let snapshot = resolved.settlement().unwrap().clone();

    assert!(resolved.join(stake("late", "Late", Side::B, dec!(500))).is_err());
    assert!(resolved.resolve(Side::A).is_err());
    assert_eq!(resolved.settlement().unwrap(), &snapshot);
    assert_eq!(snapshot.winners[0].payout, dec!(200));
}

#[test]
fn test_pool_is_fully_redistributed() {
    let scenarios: Vec<Vec<(Side, Decimal)>> = vec![
        vec![(Side::A, dec!(1)), (Side::B, dec!(2)), (Side::A, dec!(4))],
        vec![(Side::A, dec!(9.99)), (Side::A, dec!(0.01)), (Side::B, dec!(33.33))],
        vec![(Side::B, dec!(7)), (Side::A, dec!(11)), (Side::A, dec!(13)), (Side::B, dec!(17))],
        vec![(Side::A, dec!(100)), (Side::A, dec!(50))],
    ];

    for (i, stakes) in scenarios.iter().enumerate() {
        let stakes: Vec<Stake> = stakes
            .iter()
            .enumerate()
            .map(|(j, (side, amount))| {
                Stake::new(format!("p{j}"), format!("P{j}"), *side, *amount).unwrap()
            })
            .collect();
        let pool = aggregate(&stakes);
        assert_eq!(pool.side_a_total + pool.side_b_total, pool.total_pool);

        let s = distribute(&stakes, Side::A).unwrap();
        let paid = s.total_paid_out();
        assert!(
            (paid - pool.total_pool).abs() < dec!(0.0000001),
            "scenario {i}: paid {paid} of {}",
            pool.total_pool
        );

        let winner_stakes: Decimal = s.winners.iter().map(|w| w.stake.amount).sum();
        assert_eq!(s.total_lost() + winner_stakes, pool.total_pool, "scenario {i}");
        assert_eq!(distribute(&stakes, Side::A).unwrap(), s, "scenario {i}");
    }
}

#[test]
fn test_no_winners_leaves_remedy_to_caller() {
    let p = Prediction::open("g", "q", "Yes", "No", stake("cy", "Cy", Side::B, dec!(100))).unwrap();
    assert_eq!(
        p.resolve(Side::A).unwrap_err(),
        SettlementError::NoWinners { side: Side::A }
    );
    // Caller's remedy: everyone gets their own stake back.
    let refunds: Vec<(String, Decimal)> = p
        .stakes()
        .iter()
        .map(|s| (s.participant_id.clone(), s.amount))
        .collect();
    assert_eq!(refunds, vec![("cy".to_string(), dec!(100))]);
}

#[test]
fn test_router_drives_screens_independently_of_settlement() {
    let (group, open) = game_night();
    let mut router = Router::new();
    router.dispatch(Event::LoggedIn).unwrap();
    router
        .dispatch(Event::SelectGroup { group_id: group.id.clone() })
        .unwrap();
    router
        .dispatch(Event::SelectPrediction { prediction_id: open.id().to_string() })
        .unwrap();

    let resolved = open.resolve(Side::A).unwrap();
    assert_eq!(router.dispatch(Event::OutcomeConfirmed).unwrap(), View::Settle);
    assert_eq!(router.selected_prediction(), Some(resolved.id()));
}

#[tokio::test]
async fn test_losers_pay_through_venmo_app() {
    let (_, open) = game_night();
    let resolved = open.resolve(Side::A).unwrap();
    let requests = requests_for(resolved.settlement().unwrap(), PaymentRail::Venmo, "Home win").unwrap();
    assert_eq!(requests.len(), 2);

    let opener = MockOpener::with_apps();
    let launcher = PaymentLauncher::new(opener.clone(), Duration::from_millis(1));
    for (_, request) in &requests {
        let outcome = launcher.launch(request).await.unwrap();
        assert!(matches!(outcome, LaunchOutcome::OpenedApp { .. }));
    }

    assert_eq!(
        opener.opened(),
        vec![
            "venmo://paycharge?txn=pay&recipients=ana-venmo&amount=30&note=Home%20win".to_string(),
            "venmo://paycharge?txn=pay&recipients=ben-venmo&amount=70&note=Home%20win".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_cash_app_falls_back_to_web_without_app() {
    let (_, open) = game_night();
    let resolved = open.resolve(Side::B).unwrap();
    let requests = requests_for(resolved.settlement().unwrap(), PaymentRail::CashApp, "").unwrap();
    assert_eq!(requests.len(), 2);

    let opener = MockOpener::without_apps();
    let launcher = PaymentLauncher::new(opener.clone(), Duration::from_millis(1));
    let outcome = launcher.launch(&requests[0].1).await.unwrap();
    assert_eq!(
        outcome,
        LaunchOutcome::FellBackToWeb {
            deep_link: "cashapp://cash.app/$cy/30".into(),
            web_url: "https://cash.app/$cy/30".into(),
        }
    );
    assert_eq!(opener.opened().len(), 2);
}

#[tokio::test]
async fn test_zelle_copies_winner_email() {
    let (_, open) = game_night();
    let resolved = open.resolve(Side::B).unwrap();
    let requests = requests_for(resolved.settlement().unwrap(), PaymentRail::Zelle, "").unwrap();

    let opener = MockOpener::with_apps();
    let launcher = PaymentLauncher::new(opener.clone(), Duration::ZERO);
    let outcome = launcher.launch(&requests[1].1).await.unwrap();
    assert!(matches!(outcome, LaunchOutcome::CopiedToClipboard { .. }));
    assert_eq!(opener.clipboard().as_deref(), Some("cy@example.com"));
    assert!(opener.opened().is_empty());
}

#[test]
fn test_opener_failure_surfaces() {
    let (_, open) = game_night();
    let resolved = open.resolve(Side::A).unwrap();
    let requests = requests_for(resolved.settlement().unwrap(), PaymentRail::Venmo, "").unwrap();

    let opener = MockOpener::with_apps();
    opener.set_error("no browser");
    let launcher = PaymentLauncher::new(opener, Duration::ZERO);
    let result = tokio_test::block_on(launcher.launch(&requests[0].1));
    assert!(result.is_err());
}
