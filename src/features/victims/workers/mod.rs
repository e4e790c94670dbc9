mod death_sweeper;

pub use death_sweeper::DeathSweeper;
