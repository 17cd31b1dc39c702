use rusqlite::Connection;
use tracing::debug;

/// Schema definition for the tracker database
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    pub tables: Vec<TableDefinition>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_table(mut self, table: TableDefinition) -> Self {
        self.tables.push(table);
        self
    }

    /// Create every table and index that does not exist yet.
    pub fn apply(&self, conn: &Connection) -> rusqlite::Result<()> {
        for table in &self.tables {
            debug!(table = %table.name, "ensuring table");
            conn.execute_batch(&table.create_sql())?;
            for sql in table.create_index_sql() {
                conn.execute_batch(&sql)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
    pub indexes: Vec<IndexDefinition>,
}

impl TableDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
            indexes: Vec::new(),
        }
    }

    pub fn with_column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_index(mut self, index: IndexDefinition) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn create_sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(ColumnDefinition::to_sql)
            .collect::<Vec<_>>()
            .join(", ");
        format!("CREATE TABLE IF NOT EXISTS {} ({});", self.name, columns)
    }

    pub fn create_index_sql(&self) -> Vec<String> {
        self.indexes
            .iter()
            .map(|index| {
                format!(
                    "CREATE {}INDEX IF NOT EXISTS {} ON {} ({});",
                    if index.unique { "UNIQUE " } else { "" },
                    index.name,
                    self.name,
                    index.columns.join(", ")
                )
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub data_type: DataType,
    pub constraints: Vec<ColumnConstraint>,
}

impl ColumnDefinition {
    pub fn new(name: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_string(),
            data_type,
            constraints: Vec::new(),
        }
    }

    pub fn with_constraint(mut self, constraint: ColumnConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    fn to_sql(&self) -> String {
        let mut sql = format!("{} {}", self.name, self.data_type.as_sql());
        for constraint in &self.constraints {
            sql.push(' ');
            sql.push_str(constraint.as_sql());
        }
        sql
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Integer,
    Text,
}

impl DataType {
    fn as_sql(self) -> &'static str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::Text => "TEXT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnConstraint {
    /// `PRIMARY KEY AUTOINCREMENT`: rowids are never handed out twice.
    PrimaryKey,
    NotNull,
}

impl ColumnConstraint {
    fn as_sql(self) -> &'static str {
        match self {
            ColumnConstraint::PrimaryKey => "PRIMARY KEY AUTOINCREMENT",
            ColumnConstraint::NotNull => "NOT NULL",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexDefinition {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

impl IndexDefinition {
    pub fn new(name: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            unique: false,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

pub const PARCEL_TABLE: &str = "parcel";

/// The `parcel` table: one row per parcel, looked up by number or by client.
pub fn parcel_table() -> TableDefinition {
    TableDefinition::new(PARCEL_TABLE)
        .with_column(
            ColumnDefinition::new("number", DataType::Integer)
                .with_constraint(ColumnConstraint::PrimaryKey),
        )
        .with_column(
            ColumnDefinition::new("client", DataType::Integer)
                .with_constraint(ColumnConstraint::NotNull),
        )
        .with_column(
            ColumnDefinition::new("status", DataType::Text)
                .with_constraint(ColumnConstraint::NotNull),
        )
        .with_column(
            ColumnDefinition::new("address", DataType::Text)
                .with_constraint(ColumnConstraint::NotNull),
        )
        .with_column(
            ColumnDefinition::new("created_at", DataType::Text)
                .with_constraint(ColumnConstraint::NotNull),
        )
        .with_index(IndexDefinition::new("idx_parcel_client", &["client"]))
}

pub fn tracker_schema() -> Schema {
    Schema::new().add_table(parcel_table())
}
