//! Concurrency integration tests
//!
//! These tests run many workers against shared accounts and check the
//! properties that must hold under any interleaving:
//! - Zero-sum transfers conserve the total balance
//! - No balance is ever observed below zero
//! - A snapshot never observes a half-applied transfer
//! - Transfers over overlapping accounts in opposite orders never deadlock
//! - Every accepted command produces exactly one result line
//!
//! Each test runs once per locking strategy.

#[cfg(test)]
mod tests {
    use bank_ledger_engine::cli::LockingStrategy;
    use bank_ledger_engine::{
        create_ledger, AccountId, Balance, LedgerServer, ServerConfig, TransferLeg,
    };
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rstest::rstest;
    use std::collections::HashSet;
    use std::fmt::Write as _;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    const ACCOUNTS: AccountId = 16;
    const STARTING_BALANCE: Balance = 1_000;

    fn random_account(rng: &mut StdRng) -> AccountId {
        rng.gen_range(1..=ACCOUNTS)
    }

    /// A transfer over 2 to 4 distinct accounts whose amounts sum to zero
    fn zero_sum_transfer(rng: &mut StdRng) -> Vec<TransferLeg> {
        let width = rng.gen_range(2..=4);
        let mut accounts = Vec::with_capacity(width);
        while accounts.len() < width {
            let account = random_account(rng);
            if !accounts.contains(&account) {
                accounts.push(account);
            }
        }

        let mut legs: Vec<TransferLeg> = accounts[1..]
            .iter()
            .map(|&account| TransferLeg::new(account, rng.gen_range(-50..=50)))
            .collect();
        let remainder: Balance = legs.iter().map(|leg| leg.amount).sum();
        legs.push(TransferLeg::new(accounts[0], -remainder));
        legs
    }

    fn render(legs: &[TransferLeg]) -> String {
        legs.iter().fold(String::from("TRANS"), |mut line, leg| {
            let _ = write!(line, " {} {}", leg.account, leg.amount);
            line
        })
    }

    fn funding_lines() -> String {
        (1..=ACCOUNTS)
            .map(|account| format!("TRANS {account} {STARTING_BALANCE}\n"))
            .collect()
    }

    fn run_server(
        locking: LockingStrategy,
        workers: usize,
        input: String,
    ) -> (String, String, Vec<Balance>) {
        let config = ServerConfig::new(workers, ACCOUNTS, locking).unwrap();
        let mut status = Vec::new();

        let report = LedgerServer::new(config)
            .unwrap()
            .run(Cursor::new(input), &mut status, Vec::new())
            .unwrap();

        assert_eq!(report.summary.write_failures(), 0);
        (
            String::from_utf8(status).unwrap(),
            String::from_utf8(report.output).unwrap(),
            report.final_balances,
        )
    }

    #[rstest]
    fn test_zero_sum_transfers_conserve_total(
        #[values(LockingStrategy::Fine, LockingStrategy::Coarse)] locking: LockingStrategy,
    ) {
        let mut rng = StdRng::seed_from_u64(7);
        let mut input = funding_lines();
        for _ in 0..3_000 {
            input.push_str(&render(&zero_sum_transfer(&mut rng)));
            input.push('\n');
        }
        input.push_str("END\n");

        let (_, output, balances) = run_server(locking, 8, input);

        // Deposits can never be refused, so every one of them landed
        let total: Balance = balances.iter().sum();
        assert_eq!(total, STARTING_BALANCE * Balance::from(ACCOUNTS));
        assert!(balances.iter().all(|&balance| balance >= 0));
        assert!(!output.contains("INVALID"));
    }

    #[rstest]
    fn test_exactly_once_results(
        #[values(LockingStrategy::Fine, LockingStrategy::Coarse)] locking: LockingStrategy,
    ) {
        const COMMANDS: u64 = 2_000;
        let mut rng = StdRng::seed_from_u64(11);
        let mut input = String::new();
        for n in 0..COMMANDS {
            if n % 3 == 0 {
                let _ = writeln!(input, "CHECK {}", random_account(&mut rng));
            } else {
                let _ = writeln!(input, "TRANS {} 1", random_account(&mut rng));
            }
        }
        input.push_str("END\n");

        let (status, output, balances) = run_server(locking, 8, input);

        let expected_status: String = (1..=COMMANDS).map(|id| format!("ID {id}\n")).collect();
        assert_eq!(status, expected_status);

        let mut seen = HashSet::new();
        for line in output.lines() {
            let id: u64 = line.split(' ').next().unwrap().parse().unwrap();
            assert!(seen.insert(id), "sequence id {id} reported twice");
        }
        assert_eq!(seen, (1..=COMMANDS).collect::<HashSet<_>>());

        let deposits = (0..COMMANDS).filter(|n| n % 3 != 0).count() as Balance;
        assert_eq!(balances.iter().sum::<Balance>(), deposits);
    }

    #[rstest]
    fn test_snapshot_never_sees_partial_transfer(
        #[values(LockingStrategy::Fine, LockingStrategy::Coarse)] locking: LockingStrategy,
    ) {
        let ledger = create_ledger(locking, ACCOUNTS).unwrap();
        for account in 1..=ACCOUNTS {
            ledger
                .transfer(&[TransferLeg::new(account, STARTING_BALANCE)])
                .unwrap();
        }
        let expected_total = STARTING_BALANCE * Balance::from(ACCOUNTS);
        let running = AtomicBool::new(true);

        thread::scope(|scope| {
            let observer = scope.spawn(|| {
                let mut snapshots = 0;
                loop {
                    let balances = ledger.snapshot();
                    assert_eq!(balances.iter().sum::<Balance>(), expected_total);
                    assert!(balances.iter().all(|&balance| balance >= 0));
                    snapshots += 1;
                    if !running.load(Ordering::Relaxed) {
                        break snapshots;
                    }
                }
            });

            let movers: Vec<_> = (0..4u64)
                .map(|seed| {
                    let ledger = &ledger;
                    scope.spawn(move || {
                        let mut rng = StdRng::seed_from_u64(seed);
                        for _ in 0..2_000 {
                            ledger.transfer(&zero_sum_transfer(&mut rng)).unwrap();
                        }
                    })
                })
                .collect();

            for mover in movers {
                mover.join().unwrap();
            }
            running.store(false, Ordering::Relaxed);
            assert!(observer.join().unwrap() > 0);
        });
    }

    #[rstest]
    fn test_opposite_lock_orders_do_not_deadlock(
        #[values(LockingStrategy::Fine, LockingStrategy::Coarse)] locking: LockingStrategy,
    ) {
        let (done, finished) = mpsc::channel();

        thread::spawn(move || {
            let ledger = create_ledger(locking, 3).unwrap();
            ledger
                .transfer(&[
                    TransferLeg::new(1, 100),
                    TransferLeg::new(2, 100),
                    TransferLeg::new(3, 100),
                ])
                .unwrap();

            thread::scope(|scope| {
                let ledger = &ledger;
                scope.spawn(move || {
                    for _ in 0..5_000 {
                        ledger
                            .transfer(&[TransferLeg::new(1, -1), TransferLeg::new(2, 1)])
                            .unwrap();
                    }
                });
                scope.spawn(move || {
                    for _ in 0..5_000 {
                        ledger
                            .transfer(&[TransferLeg::new(2, -1), TransferLeg::new(1, 1)])
                            .unwrap();
                    }
                });
                scope.spawn(move || {
                    for _ in 0..5_000 {
                        ledger
                            .transfer(&[
                                TransferLeg::new(3, -1),
                                TransferLeg::new(2, 1),
                                TransferLeg::new(1, 0),
                            ])
                            .unwrap();
                        ledger
                            .transfer(&[TransferLeg::new(2, -1), TransferLeg::new(3, 1)])
                            .unwrap();
                    }
                });
            });

            let _ = done.send(ledger.snapshot());
        });

        let balances = finished
            .recv_timeout(Duration::from_secs(60))
            .expect("transfers did not finish; likely deadlock");
        assert_eq!(balances.iter().sum::<Balance>(), 300);
        assert!(balances.iter().all(|&balance| balance >= 0));
    }
}
