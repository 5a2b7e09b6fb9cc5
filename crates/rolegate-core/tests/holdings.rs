//! Holdings aggregation against a scripted contract client.

use std::sync::Arc;
use std::time::Duration;

use chain_reader::fakes::ScriptedContractClient;
use chain_reader::{
    parse_address, Address, BreedingPair, ChainError, ContractMethod, ContractValue, TokenId,
};
use rolegate_core::{
    ContractCallError, ContractReader, HoldingAggregator, HoldingCategory, ReaderConfig,
    RuleContracts, StakingGeneration,
};

const WALLET: &str = "0x00000000000000000000000000000000000000aa";

fn wallet() -> Address {
    parse_address(WALLET).unwrap()
}

fn contracts() -> RuleContracts {
    RuleContracts {
        genesis: Some(parse_address("0xC7492fDE60f2eA4DBa3d7660e9B6F651b2841f00").unwrap()),
        baby: Some(parse_address("0x00000000000000000000000000000000000000b1").unwrap()),
        staking_v1: Some(parse_address("0x5f7BA84c7984Aa5ef329B66E313498F0aEd6d23A").unwrap()),
        staking_v2: Some(parse_address("0x00000000000000000000000000000000000000c2").unwrap()),
        breeding: Some(parse_address("0x15cc16bfe6fac624247490aa29b6d632be549f00").unwrap()),
    }
}

fn aggregator(client: Arc<ScriptedContractClient>) -> HoldingAggregator {
    HoldingAggregator::new(
        ContractReader::new(client, ReaderConfig::default()),
        contracts(),
    )
}

fn pair(a: u64, b: u64) -> ContractValue {
    ContractValue::Pair(BreedingPair {
        parent_id1: TokenId(a),
        parent_id2: TokenId(b),
    })
}

fn with_breeding_events(client: ScriptedContractClient) -> ScriptedContractClient {
    let breeding = contracts().breeding.unwrap();
    let owner = wallet();
    client
        .with_value(
            breeding,
            ContractMethod::BreedingEventsLength { owner },
            ContractValue::Count(3),
        )
        .with_value(
            breeding,
            ContractMethod::BreedingEventAt { owner, index: 0 },
            pair(10, 11),
        )
        .with_value(
            breeding,
            ContractMethod::BreedingEventAt { owner, index: 1 },
            pair(20, 21),
        )
        .with_value(
            breeding,
            ContractMethod::BreedingEventAt { owner, index: 2 },
            pair(30, 31),
        )
}

#[tokio::test]
async fn three_breeding_events_flatten_to_six_parents_in_order() {
    let client = Arc::new(with_breeding_events(ScriptedContractClient::new()));

    let snapshot = aggregator(client).check(Some(WALLET)).await;

    assert_eq!(
        snapshot.breeding_parents,
        [10, 11, 20, 21, 30, 31].map(TokenId).to_vec()
    );
    assert!(snapshot.failed_categories.is_empty());
}

#[tokio::test]
async fn staked_tokens_are_returned_verbatim() {
    let c = contracts();
    let client = Arc::new(
        ScriptedContractClient::new()
            .with_value(
                c.staking_v1.unwrap(),
                ContractMethod::GetTokensStaked { staker: wallet() },
                ContractValue::Tokens(vec![TokenId(101), TokenId(7)]),
            )
            .with_value(
                c.staking_v2.unwrap(),
                ContractMethod::TokensStaked { staker: wallet() },
                ContractValue::Tokens(vec![TokenId(3)]),
            ),
    );

    let snapshot = aggregator(client).check(Some(WALLET)).await;

    assert_eq!(
        snapshot.staked_v1.iter().copied().collect::<Vec<_>>(),
        vec![TokenId(7), TokenId(101)]
    );
    assert_eq!(
        snapshot.staked_v2.iter().copied().collect::<Vec<_>>(),
        vec![TokenId(3)]
    );
    assert!(snapshot.genesis_tokens.is_empty());
    assert!(snapshot.baby_tokens.is_empty());
}

#[tokio::test]
async fn failing_category_does_not_block_the_others() {
    let c = contracts();
    let client = Arc::new(
        with_breeding_events(ScriptedContractClient::new())
            .with_failure(
                c.genesis.unwrap(),
                ContractMethod::BalanceOf { owner: wallet() },
                ChainError::Transport("connection reset".to_string()),
            )
            .with_value(
                c.baby.unwrap(),
                ContractMethod::BalanceOf { owner: wallet() },
                ContractValue::Count(2),
            ),
    );

    let snapshot = aggregator(client).check(Some(WALLET)).await;

    assert_eq!(
        snapshot.failed_categories,
        [HoldingCategory::Genesis].into_iter().collect()
    );
    assert!(snapshot.genesis_tokens.is_empty());
    assert_eq!(
        snapshot.baby_tokens.iter().copied().collect::<Vec<_>>(),
        vec![TokenId::PLACEHOLDER]
    );
    assert_eq!(snapshot.breeding_parents.len(), 6);
}

#[tokio::test]
async fn breeding_read_failing_midway_marks_breeding_failed() {
    let breeding = contracts().breeding.unwrap();
    let client = Arc::new(
        ScriptedContractClient::new()
            .with_value(
                breeding,
                ContractMethod::BreedingEventsLength { owner: wallet() },
                ContractValue::Count(2),
            )
            .with_value(
                breeding,
                ContractMethod::BreedingEventAt {
                    owner: wallet(),
                    index: 0,
                },
                pair(1, 2),
            ),
    );

    let snapshot = aggregator(client).check(Some(WALLET)).await;

    assert!(snapshot.breeding_parents.is_empty());
    assert!(snapshot.failed_categories.contains(&HoldingCategory::Breeding));
}

#[tokio::test]
async fn empty_wallet_makes_no_calls() {
    let client = Arc::new(ScriptedContractClient::new());

    let snapshot = aggregator(client.clone()).check(None).await;
    assert!(snapshot.is_empty());

    let snapshot = aggregator(client.clone()).check(Some("")).await;
    assert!(snapshot.is_empty());

    assert_eq!(client.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn hanging_call_times_out() {
    let staking = contracts().staking_v1.unwrap();
    let client = Arc::new(
        ScriptedContractClient::new()
            .with_hang(staking, ContractMethod::GetTokensStaked { staker: wallet() }),
    );
    let reader = ContractReader::new(
        client,
        ReaderConfig::default().with_call_timeout(Duration::from_secs(3)),
    );

    let err = reader
        .staked_tokens(staking, StakingGeneration::V1, Some(WALLET))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ContractCallError::Timeout {
            method: "getTokensStaked".to_string(),
            after_ms: 3000,
        }
    );
}

#[tokio::test(start_paused = true)]
async fn hanging_category_is_marked_failed() {
    let c = contracts();
    let client = Arc::new(
        ScriptedContractClient::new()
            .with_hang(
                c.staking_v1.unwrap(),
                ContractMethod::GetTokensStaked { staker: wallet() },
            )
            .with_value(
                c.staking_v2.unwrap(),
                ContractMethod::TokensStaked { staker: wallet() },
                ContractValue::Tokens(vec![TokenId(9)]),
            ),
    );

    let snapshot = aggregator(client).check(Some(WALLET)).await;

    assert!(snapshot.failed_categories.contains(&HoldingCategory::StakingV1));
    assert!(snapshot.holds(HoldingCategory::StakingV2));
}
