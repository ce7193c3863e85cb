use redb::TableDefinition;

/// Blocks by CID; values are canonical rkyv encodings.
pub const BLOCKS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("blocks");
