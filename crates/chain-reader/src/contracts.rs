//! Solidity interfaces read by rolegate.
//!
//! Only the view functions the holdings check calls are declared. The
//! breeding getter is declared with the two leading struct members; the
//! decoder reads the head words and ignores the rest of the tuple.

#![allow(missing_docs, non_camel_case_types, non_snake_case)]

use alloy_sol_types::sol;

sol! {
    /// Genesis and baby collections (ERC-721).
    #[derive(Debug)]
    interface IErc721 {
        function balanceOf(address owner) external view returns (uint256);
    }

    /// First-generation staking contract.
    #[derive(Debug)]
    interface IStakingV1 {
        function getTokensStaked(address staker) external view returns (uint256[] memory);
    }

    /// Second-generation staking contract.
    #[derive(Debug)]
    interface IStakingV2 {
        function tokensStaked(address staker) external view returns (uint256[] memory);
    }

    /// Breeding contract: per-address list of breeding events.
    #[derive(Debug)]
    interface IBreeding {
        function getBreedingEventsLengthByAddress(address owner) external view returns (uint256);

        function _addressToBreedingEvents(address owner, uint256 index)
            external
            view
            returns (uint256 parentId1, uint256 parentId2);
    }
}
