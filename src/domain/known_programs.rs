//! Known Program Addresses
//!
//! Default swap-program ids used for log classification, plus the base-asset
//! mint the copy trader refers to by address.

/// Raydium / Serum programs watched for by default
pub const DEFAULT_SWAP_PROGRAMS: &[&str] = &[
    // Raydium AMM routing
    "amm2nQDp4c9bBSNTSeJgvDZoXQAJCUAwnkMdmgz7VRus",
    // Serum / OpenBook
    "EhhTKzsyKghC7AgbQqUfRhxMaiH3Cc9QvSG4pEyJRfb",
    // Serum DEX v3
    "9xQeWvG816bUx9EPf7BcNsEcN2ppv1Y1nR3jZ2Y3fZbp",
];

/// Native SOL mint (wrapped SOL)
pub const WSOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// Decimals of native SOL
pub const SOL_DECIMALS: u8 = 9;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SwapProgramSet;

    #[test]
    fn test_default_swap_program_set() {
        let set = SwapProgramSet::new(DEFAULT_SWAP_PROGRAMS.iter().copied());
        assert_eq!(set.len(), 3);
        assert!(set.contains("9xQeWvG816bUx9EPf7BcNsEcN2ppv1Y1nR3jZ2Y3fZbp"));
    }

    #[test]
    fn test_wsol_matches_native_mint() {
        assert_eq!(spl_token::native_mint::id().to_string(), WSOL_MINT);
    }
}
