fn main() {
    runner_game::game::run();
}
