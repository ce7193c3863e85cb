use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use redb::{Database, ReadableDatabase};
use rkyv::{Archived, deserialize};

use crate::chain::BlockLoader;
use crate::state::{block::Block, canonical_bytes, cid::Cid};
use crate::storage::tables::BLOCKS;

/// Content-addressed block store.
///
/// Blocks are keyed by CID, so a put is idempotent and a get is
/// deterministic: the same CID always resolves to the same bytes. The store
/// never deletes; both sides of a reorg stay loadable.
pub struct BlockStore {
    db: Database,
}

impl BlockStore {
    /// Opens a database from a path to the database file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = if path.as_ref().exists() {
            Database::open(path).context("Failed to open database")?
        } else {
            Database::create(path).context("Failed to create database")?
        };
        let store = Self { db };
        store.init_tables()?;
        Ok(store)
    }

    /// Opens a database from a configuration path.
    ///
    /// The .toml file needs a single `[storage]` table holding the database
    /// `path`; a `STORAGE__PATH` environment variable overrides it.
    pub fn from_config_path<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name(config_path.as_ref().to_str().unwrap()))
            .add_source(
                Environment::with_prefix("STORAGE")
                    .keep_prefix(true)
                    .separator("__"),
            )
            .build()
            .context("Failed to read storage config")?;
        let path = config
            .get_string("storage.path")
            .context("Missing storage.path in config")?;
        Self::open(path)
    }

    /// Initializes the tables in the database
    fn init_tables(&self) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        {
            write_txn
                .open_table(BLOCKS)
                .context("Failed to open blocks table")?;
        }
        write_txn
            .commit()
            .context("Failed to commit write transaction")
    }

    /// Puts a block into the database and returns its CID.
    ///
    /// The block is encoded once; the key is the digest of those same bytes,
    /// so the stored value always matches its CID.
    pub fn put_block(&self, block: &Block) -> Result<Cid> {
        let bytes = canonical_bytes(block)?;
        let cid = Cid::digest(&bytes);

        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        {
            let mut table = write_txn
                .open_table(BLOCKS)
                .context("Failed to open blocks table")?;
            table
                .insert(cid.as_ref(), bytes.as_ref())
                .context("Failed to insert block")?;
        }
        write_txn
            .commit()
            .context("Failed to commit write transaction")?;
        Ok(cid)
    }

    /// Retrieves a block from the database, if it exists.
    pub fn get_block(&self, cid: &Cid) -> Result<Option<Block>> {
        let read = self.db.begin_read()?;
        let table = read.open_table(BLOCKS)?;
        if let Some(row) = table.get(cid.as_ref())? {
            let archived = unsafe { decode_block(row.value()) };
            let block = deserialize::<Block, rkyv::rancor::Error>(archived)
                .map_err(|e| anyhow::anyhow!("Failed to decode block: {:?}", e))?;
            Ok(Some(block))
        } else {
            Ok(None)
        }
    }
}

/// Reinterprets stored bytes as an archived block.
///
/// The bytes must be a canonical block encoding written by [`BlockStore::put_block`];
/// the store only reads back values it wrote itself.
unsafe fn decode_block(bytes: &[u8]) -> &Archived<Block> {
    unsafe { rkyv::access_unchecked::<Archived<Block>>(bytes) }
}

impl BlockLoader for BlockStore {
    fn load_block(&self, cid: &Cid) -> Result<Option<Block>> {
        self.get_block(cid)
    }
}
