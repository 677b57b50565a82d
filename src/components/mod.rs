pub mod prize_board;
