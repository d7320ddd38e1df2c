mod account;
mod goal_flow;
mod review_flow;
mod signup_flow;
