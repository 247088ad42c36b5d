pub mod rest;
pub mod seaorm;
