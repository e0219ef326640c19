pub(crate) mod cheapshark;
